//! Document store: reading documents from disk and writing them back.
//!
//! Each call opens and closes its own file handle. Nothing here knows about
//! tags or policy flags; the facade decides when to load and persist.

use crate::common::{Charset, Error, Result};
use crate::tree::{Document, SerializeOptions};
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

/// Read and parse the file at `path`.
///
/// The whole file is decoded with `charset` (a leading BOM wins) before it
/// is parsed.
pub fn load(path: &Path, charset: &Charset) -> Result<Document> {
    if !path.exists() {
        return Err(Error::NotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::io(path, e),
    })?;
    log::debug!(
        "loading {} ({} bytes, charset {})",
        path.display(),
        bytes.len(),
        charset
    );

    let text = charset
        .decode(&bytes)
        .map_err(|e| with_path(e, path))?;
    parse_text(&text).map_err(|e| with_path(e, path))
}

/// Parse a document held in memory.
pub fn parse_text(text: &str) -> Result<Document> {
    Document::parse_str(text)
}

/// Write `document` to `path`, then read it back.
///
/// The document is normalized and rendered indented without a declaration,
/// encoded with `charset`, and replaces any existing file. The returned tree
/// is the one parsed from the written file, so callers see exactly what a
/// later load would.
pub fn persist(document: &mut Document, path: &Path, charset: &Charset) -> Result<Document> {
    let options = SerializeOptions::default()
        .indent(true)
        .omit_declaration(true)
        .encoding(charset.name());
    let xml = document
        .serialize(&options)
        .map_err(|e| with_path(e, path))?;
    let bytes = charset.encode(&xml).map_err(|e| with_path(e, path))?;

    write_file(path, &bytes)?;
    log::debug!(
        "persisted {} ({} bytes, charset {})",
        path.display(),
        bytes.len(),
        charset
    );

    load(path, charset).map_err(|source| Error::PostPersistReload {
        path: path.to_path_buf(),
        source: Box::new(source),
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))
}

/// Prefix message-only errors with the file they concern.
fn with_path(err: Error, path: &Path) -> Error {
    match err {
        Error::Parse(msg) => Error::Parse(format!("{}: {}", path.display(), msg)),
        Error::Encoding(msg) => Error::Encoding(format!("{}: {}", path.display(), msg)),
        Error::Render(msg) => Error::Render(format!("{}: {}", path.display(), msg)),
        other => other,
    }
}

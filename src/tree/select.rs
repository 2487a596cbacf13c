//! Node selection used before rendering.
//!
//! Equivalent of the query `//text()[normalize-space()='']`: every Text or
//! CDATA node, anywhere under the root, whose content is empty once XML
//! whitespace is trimmed.

use super::parser::is_xml_whitespace;
use super::{Document, NodeId};

/// Select all whitespace-only character-data nodes in document order.
pub fn whitespace_only_text(doc: &Document) -> Vec<NodeId> {
    doc.descendants(doc.root())
        .filter(|&id| {
            doc.kind(id)
                .character_data()
                .is_some_and(is_xml_whitespace)
        })
        .collect()
}

/// Detach every node selected by [`whitespace_only_text`].
///
/// Returns how many nodes were removed. This mutates the document: the
/// original insignificant whitespace is gone afterwards.
pub fn strip_whitespace_text(doc: &mut Document) -> usize {
    let selected = whitespace_only_text(doc);
    doc.detach_all(&selected);
    selected.len()
}

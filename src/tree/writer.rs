//! Renders a [`Document`] sub-tree to text with the quick-xml writer.

use super::{Document, NodeId, NodeKind};
use crate::common::xml::{escape_xml, is_xml_char, is_xml_name};
use crate::common::{Error, Result, UTF_8};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// Default number of spaces per nesting level.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Options controlling rendering.
///
/// The defaults give indented output without an XML declaration.
///
/// # Examples
///
/// ```
/// use tagdoc::tree::{Document, SerializeOptions};
///
/// let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
/// let options = SerializeOptions::default().indent_width(2);
/// assert_eq!(
///     doc.render(doc.root(), &options).unwrap(),
///     "<root>\n  <child>Hello</child>\n</root>"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Pretty-print child elements on their own lines.
    pub indent: bool,
    /// Spaces per nesting level when `indent` is set.
    pub indent_width: usize,
    /// Leave out the `<?xml ...?>` header.
    pub omit_declaration: bool,
    /// Charset named in the declaration.
    pub encoding: String,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent: true,
            indent_width: DEFAULT_INDENT_WIDTH,
            omit_declaration: true,
            encoding: UTF_8.to_string(),
        }
    }
}

impl SerializeOptions {
    #[must_use]
    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    #[must_use]
    pub fn omit_declaration(mut self, omit: bool) -> Self {
        self.omit_declaration = omit;
        self
    }

    #[must_use]
    pub fn encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }
}

/// Render the sub-tree rooted at `node`.
///
/// Fails instead of producing partial output when the tree holds something
/// that cannot be written as well-formed XML: an invalid element or
/// attribute name, a character XML does not allow, or a comment containing
/// `--`.
pub fn render(doc: &Document, node: NodeId, options: &SerializeOptions) -> Result<String> {
    let mut writer = if options.indent {
        Writer::new_with_indent(Vec::new(), b' ', options.indent_width)
    } else {
        Writer::new(Vec::new())
    };

    if !options.omit_declaration {
        let decl = BytesDecl::new("1.0", Some(options.encoding.as_str()), Some("no"));
        emit(&mut writer, Event::Decl(decl))?;
    }
    write_node(&mut writer, doc, node)?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::Render(e.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, doc: &Document, id: NodeId) -> Result<()> {
    match doc.kind(id) {
        NodeKind::Element { name, attributes } => {
            check_name(name)?;
            let mut start = BytesStart::new(name.as_str());
            for attr in attributes {
                check_name(&attr.name)?;
                check_chars(&attr.value)?;
                let value = escape_xml(&attr.value);
                start.push_attribute((attr.name.as_bytes(), value.as_bytes()));
            }

            let children = doc.children(id);
            if children.is_empty() {
                return emit(writer, Event::Empty(start));
            }
            emit(writer, Event::Start(start))?;
            for &child in children {
                write_node(writer, doc, child)?;
            }
            emit(writer, Event::End(BytesEnd::new(name.as_str())))
        },
        NodeKind::Text { content } => {
            check_chars(content)?;
            emit(writer, Event::Text(BytesText::from_escaped(escape_xml(content))))
        },
        NodeKind::CData { content } => {
            check_chars(content)?;
            for section in cdata_sections(content) {
                emit(writer, Event::CData(BytesCData::new(section)))?;
            }
            Ok(())
        },
        NodeKind::Comment { content } => {
            if content.contains("--") || content.ends_with('-') {
                return Err(Error::Render(format!(
                    "comment cannot contain \"--\": {:?}",
                    content
                )));
            }
            check_chars(content)?;
            emit(writer, Event::Comment(BytesText::from_escaped(content.as_str())))
        },
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Render(e.to_string()))
}

/// Split CDATA content so that no section contains the `]]>` terminator.
fn cdata_sections(content: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = content;
    while let Some(pos) = rest.find("]]>") {
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

/// Reject names that would break the markup.
fn check_name(name: &str) -> Result<()> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(Error::Render(format!("invalid XML name \"{}\"", name)))
    }
}

fn check_chars(content: &str) -> Result<()> {
    match content.chars().find(|&ch| !is_xml_char(ch)) {
        Some(ch) => Err(Error::Render(format!(
            "character U+{:04X} is not allowed in XML",
            ch as u32
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact() -> SerializeOptions {
        SerializeOptions::default().indent(false)
    }

    #[test]
    fn test_indented_output() {
        let doc = Document::parse_str("<teste><cod>007</cod><msg>Hello world</msg></teste>").unwrap();
        let xml = render(&doc, doc.root(), &SerializeOptions::default()).unwrap();
        assert_eq!(
            xml,
            "<teste>\n    <cod>007</cod>\n    <msg>Hello world</msg>\n</teste>"
        );
    }

    #[test]
    fn test_declaration_names_encoding() {
        let doc = Document::parse_str("<a/>").unwrap();
        let options = compact().omit_declaration(false).encoding("ISO-8859-1");
        assert_eq!(
            render(&doc, doc.root(), &options).unwrap(),
            "<?xml version=\"1.0\" encoding=\"ISO-8859-1\" standalone=\"no\"?><a/>"
        );

        let indented = SerializeOptions::default().omit_declaration(false);
        let xml = render(&doc, doc.root(), &indented).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\""));
        assert!(xml.ends_with("?>\n<a/>"));
    }

    #[test]
    fn test_escaping() {
        let mut doc = Document::new("a");
        let root = doc.root();
        doc.set_attribute(root, "q", "x\"<&>");
        doc.set_text_content(root, "1 < 2 & 3");
        assert_eq!(
            render(&doc, root, &compact()).unwrap(),
            "<a q=\"x&quot;&lt;&amp;&gt;\">1 &lt; 2 &amp; 3</a>"
        );
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        let mut doc = Document::new("a");
        let root = doc.root();
        let node = doc.create_cdata("x]]>y");
        doc.append_child(root, node);
        let xml = render(&doc, root, &compact()).unwrap();
        assert_eq!(xml, "<a><![CDATA[x]]]]><![CDATA[>y]]></a>");
        let reparsed = Document::parse_str(&xml).unwrap();
        assert_eq!(reparsed.text_content(reparsed.root()), "x]]>y");
    }

    #[test]
    fn test_sub_tree_only() {
        let doc = Document::parse_str("<a><b k=\"v\"><c>1</c></b><d/></a>").unwrap();
        let b = doc.element_by_tag_name("b", 0).unwrap();
        assert_eq!(
            render(&doc, b, &compact()).unwrap(),
            "<b k=\"v\"><c>1</c></b>"
        );
    }

    #[test]
    fn test_invalid_content_is_a_render_error() {
        let mut doc = Document::new("a");
        let root = doc.root();
        let bad = doc.create_element("not a name");
        doc.append_child(root, bad);
        assert!(matches!(render(&doc, root, &compact()), Err(Error::Render(_))));

        let mut doc = Document::new("a");
        let root = doc.root();
        let comment = doc.create_comment("a -- b");
        doc.append_child(root, comment);
        assert!(matches!(render(&doc, root, &compact()), Err(Error::Render(_))));

        let mut doc = Document::new("a");
        let root = doc.root();
        doc.set_text_content(root, "nul\0");
        assert!(matches!(render(&doc, root, &compact()), Err(Error::Render(_))));
    }

    #[test]
    fn test_cdata_sections() {
        assert_eq!(cdata_sections("plain"), ["plain"]);
        assert_eq!(cdata_sections("]]>"), ["]]", ">"]);
    }
}

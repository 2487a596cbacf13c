//! Node payloads.
//!
//! Navigation links live in the arena record; this module only carries what
//! each kind of node holds.

use smallvec::SmallVec;

/// Attributes of one element, in document order. Most elements carry few.
pub type Attributes = SmallVec<[Attribute; 4]>;

/// A name/value pair on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// Unescaped value.
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The kind of a node and its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element such as `<cod charset="utf-8">`.
    Element {
        /// Tag name, prefix included when present.
        name: String,
        attributes: Attributes,
    },

    /// Character data with references already resolved.
    Text { content: String },

    /// A `<![CDATA[...]]>` section, kept verbatim.
    CData { content: String },

    /// A comment, without the `<!--` and `-->` delimiters.
    Comment { content: String },
}

impl NodeKind {
    /// Element name, or `None` for character data and comments.
    #[inline]
    pub fn element_name(&self) -> Option<&str> {
        match self {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Character data carried by Text and CDATA nodes.
    #[inline]
    pub fn character_data(&self) -> Option<&str> {
        match self {
            NodeKind::Text { content } | NodeKind::CData { content } => Some(content),
            _ => None,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, NodeKind::Element { .. })
    }
}

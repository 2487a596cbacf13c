//! Arena-backed XML document tree.
//!
//! All nodes live in a `Vec` owned by the [`Document`] and are addressed by
//! [`NodeId`]. Children are ordered index lists; the parent link is a plain
//! `Option<NodeId>`, so there is no ownership cycle and dropping the document
//! frees everything at once.
//!
//! Detached nodes stay allocated but become unreachable from the root, and
//! every traversal starts at the root.
//!
//! # Examples
//!
//! ```
//! use tagdoc::tree::Document;
//!
//! let doc = Document::parse_str("<teste><cod>001</cod><cod>002</cod></teste>").unwrap();
//! let second = doc.element_by_tag_name("cod", 1).unwrap();
//! assert_eq!(doc.text_content(second), "002");
//! assert_eq!(doc.count_elements("cod"), 2);
//! ```

mod node;
pub mod parser;
pub mod select;
pub mod writer;

pub use node::{Attribute, Attributes, NodeKind};
pub use writer::SerializeOptions;

use crate::common::Result;
use std::collections::HashSet;

/// Index of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An XML document with exactly one root element.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Document {
    /// Create a document holding an empty root element.
    pub fn new(root_name: &str) -> Self {
        let mut doc = Self {
            nodes: Vec::with_capacity(32),
            root: NodeId(0),
        };
        doc.root = doc.create_element(root_name);
        doc
    }

    /// Parse a document from text.
    pub fn parse_str(text: &str) -> Result<Self> {
        parser::parse_str(text)
    }

    /// Render the sub-tree rooted at `node`.
    ///
    /// Does not normalize whitespace; see [`select::strip_whitespace_text`].
    pub fn render(&self, node: NodeId, options: &SerializeOptions) -> Result<String> {
        writer::render(self, node, options)
    }

    /// Normalize, then render the whole document.
    ///
    /// Whitespace-only text nodes are removed from `self` first so indented
    /// output does not depend on the whitespace the document was read with.
    /// Serializing the same document twice yields the same text.
    pub fn serialize(&mut self, options: &SerializeOptions) -> Result<String> {
        let removed = select::strip_whitespace_text(self);
        if removed > 0 {
            log::trace!("normalization removed {} whitespace-only text nodes", removed);
        }
        writer::render(self, self.root, options)
    }

    /// The root element.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    /// Payload of a node.
    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    /// Tag name of an element node.
    #[inline]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.kind(id).element_name()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// Child nodes that are elements.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.kind(child).is_element())
    }

    /// Attributes of an element in stored order; empty for other nodes.
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.data(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Set an attribute, replacing the value in place if the name exists.
    ///
    /// Ignored on non-element nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attributes, .. } = &mut self.data_mut(id).kind {
            match attributes.iter_mut().find(|attr| attr.name == name) {
                Some(attr) => attr.value = value.to_string(),
                None => attributes.push(Attribute::new(name, value)),
            }
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Option<String> {
        match &mut self.data_mut(id).kind {
            NodeKind::Element { attributes, .. } => {
                let pos = attributes.iter().position(|attr| attr.name == name)?;
                Some(attributes.remove(pos).value)
            },
            _ => None,
        }
    }

    /// Concatenated character data of all descendant Text and CDATA nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut text = String::new();
        for node in self.descendants(id) {
            if let Some(data) = self.kind(node).character_data() {
                text.push_str(data);
            }
        }
        text
    }

    /// Pre-order traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![id],
        }
    }

    /// Every element named `name`, in document order, root included.
    pub fn elements_by_tag_name<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(self.root)
            .filter(move |&id| self.name(id) == Some(name))
    }

    /// The `index`-th element named `name` (0-based, document order).
    pub fn element_by_tag_name(&self, name: &str, index: usize) -> Option<NodeId> {
        self.elements_by_tag_name(name).nth(index)
    }

    /// Number of elements named `name`.
    pub fn count_elements(&self, name: &str) -> usize {
        self.elements_by_tag_name(name).count()
    }

    // --- Mutation ---

    /// # Panics
    ///
    /// Panics if the arena outgrows `u32` indices.
    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = u32::try_from(self.nodes.len()).expect("document arena exceeds u32 indices");
        let id = NodeId(index);
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.create_node(NodeKind::Element {
            name: name.to_string(),
            attributes: Attributes::new(),
        })
    }

    /// Allocate a detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.create_node(NodeKind::Text {
            content: content.to_string(),
        })
    }

    /// Allocate a detached CDATA node.
    pub fn create_cdata(&mut self, content: &str) -> NodeId {
        self.create_node(NodeKind::CData {
            content: content.to_string(),
        })
    }

    /// Allocate a detached comment node.
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.create_node(NodeKind::Comment {
            content: content.to_string(),
        })
    }

    /// Append character data to `parent`, extending its last child when that
    /// is already a text node.
    pub(crate) fn append_text(&mut self, parent: NodeId, content: &str) {
        if let Some(&last) = self.children(parent).last() {
            if let NodeKind::Text { content: existing } = &mut self.data_mut(last).kind {
                existing.push_str(content);
                return;
            }
        }
        let node = self.create_text(content);
        self.append_child(parent, node);
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.data_mut(child).parent = Some(parent);
        self.data_mut(parent).children.push(child);
    }

    /// Unlink a node from its parent. The node stays in the arena.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.data_mut(id).parent.take() else {
            return;
        };
        self.data_mut(parent).children.retain(|&child| child != id);
    }

    /// Detach many nodes at once.
    ///
    /// Each affected parent rebuilds its child list a single time, so this
    /// stays linear where repeated [`detach`](Document::detach) calls would be
    /// quadratic in the number of siblings.
    pub fn detach_all(&mut self, ids: &[NodeId]) {
        let removed: HashSet<NodeId> = ids.iter().copied().collect();
        let mut parents = Vec::new();
        for &id in &removed {
            if let Some(parent) = self.data_mut(id).parent.take() {
                parents.push(parent);
            }
        }
        parents.sort_unstable();
        parents.dedup();
        for parent in parents {
            self.data_mut(parent)
                .children
                .retain(|child| !removed.contains(child));
        }
    }

    /// Drop every node that is no longer reachable from the root.
    ///
    /// Detached nodes are never reused, so the arena only grows as a document
    /// is edited; this rebuilds it with the reachable nodes in document order.
    /// Every [`NodeId`] obtained before the call is invalidated. Returns how
    /// many nodes were dropped.
    pub fn compact(&mut self) -> usize {
        let order: Vec<NodeId> = self.descendants(self.root).collect();
        let dropped = self.nodes.len() - order.len();
        if dropped == 0 {
            return 0;
        }

        let mut remap: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for (new, &old) in order.iter().enumerate() {
            // fewer nodes than before, so the index still fits
            remap[old.index()] = Some(NodeId(new as u32));
        }

        let mut old_nodes: Vec<Option<NodeData>> =
            std::mem::take(&mut self.nodes).into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for &old in &order {
            if let Some(mut data) = old_nodes[old.index()].take() {
                data.parent = data.parent.and_then(|parent| remap[parent.index()]);
                data.children = data
                    .children
                    .iter()
                    .filter_map(|child| remap[child.index()])
                    .collect();
                nodes.push(data);
            }
        }

        self.nodes = nodes;
        self.root = NodeId(0);
        dropped
    }

    /// Number of allocated nodes, reachable or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.data_mut(id).children);
        for child in children {
            self.data_mut(child).parent = None;
        }
    }

    /// Replace all children with a single text node.
    ///
    /// An empty `text` leaves the element without children.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        self.clear_children(id);
        if !text.is_empty() {
            let node = self.create_text(text);
            self.append_child(id, node);
        }
    }
}

/// Pre-order iterator returned by [`Document::descendants`].
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}

//! Arena-backed document tree.

use serde::{Deserialize, Serialize};

use crate::universe::{Universe, UniverseMut};

/// Handle to a node in a [`Document`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Element { tag: String, #[serde(default)] attrs: Vec<(String, String)> },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

/// Mutable tree of element and text nodes.
///
/// Nodes are never freed: detaching a node leaves it in the arena so it
/// can be re-attached elsewhere, which is how merged cell content moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
}

pub const ROOT_NAME: &str = "#root";

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let root = NodeData {
            kind: NodeKind::Element { tag: ROOT_NAME.to_string(), attrs: Vec::new() },
            parent: None,
            children: Vec::new(),
        };
        Self { nodes: vec![root], root: NodeId(0) }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots, detached nodes and the root included.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Whether `id` names a slot of this arena. Handles kept across
    /// [`History`](crate::history::History) undo, or deserialized from
    /// elsewhere, may not.
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData { kind, parent: None, children: Vec::new() });
        id
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeKind::Element { tag: tag.to_ascii_lowercase(), attrs: Vec::new() })
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeKind::Text { text: text.to_string() })
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id.0)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|n| &n.kind)
    }

    /// Tag name for elements, `None` for text nodes.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { tag, .. } => Some(tag.as_str()),
            NodeKind::Text { .. } => None,
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text { text } => Some(text.as_str()),
            NodeKind::Element { .. } => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { attrs, .. } => {
                attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
            }
            NodeKind::Text { .. } => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match self.kind(id) {
            Some(NodeKind::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    /// Set or replace an attribute. Ignored on text nodes.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(NodeData { kind: NodeKind::Element { attrs, .. }, .. }) = self.nodes.get_mut(id.0) {
            if let Some(slot) = attrs.iter_mut().find(|(k, _)| k == name) {
                slot.1 = value.to_string();
            } else {
                attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(NodeData { kind: NodeKind::Element { attrs, .. }, .. }) = self.nodes.get_mut(id.0) {
            attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Children of `id`; empty for handles this arena does not contain.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let pos = self.children(parent).iter().position(|c| *c == id)?;
        Some((parent, pos))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, pos) = self.index_in_parent(id)?;
        self.children(parent).get(pos + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, pos) = self.index_in_parent(id)?;
        pos.checked_sub(1).and_then(|p| self.children(parent).get(p).copied())
    }

    /// Proper ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |n| self.parent(*n))
    }

    /// Pre-order descendants, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Descendant elements with the given tag, in document order.
    pub fn find_all(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|n| self.tag(*n) == Some(tag))
            .collect()
    }

    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            None => String::new(),
            Some(NodeKind::Text { text }) => text.clone(),
            Some(NodeKind::Element { .. }) => self
                .descendants(id)
                .into_iter()
                .filter_map(|n| self.text(n))
                .collect(),
        }
    }

    /// Detach `id` from its parent, keeping its subtree intact.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id.0).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|c| *c != id);
        }
    }

    /// Append `child` to `parent`, moving it if it is already attached.
    ///
    /// Appending a node under itself or one of its descendants is ignored.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.contains(parent) || !self.contains(child) {
            tracing::warn!(?parent, ?child, "append with a handle outside the arena");
            return;
        }
        if parent == child || self.ancestors(parent).any(|a| a == child) {
            tracing::warn!(?parent, ?child, "refusing to append a node into its own subtree");
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn empty(&mut self, id: NodeId) {
        let children = self.nodes.get_mut(id.0).map(|n| std::mem::take(&mut n.children)).unwrap_or_default();
        for child in children {
            if let Some(c) = self.nodes.get_mut(child.0) {
                c.parent = None;
            }
        }
    }
}

impl Universe for Document {
    type Item = NodeId;

    fn parent(&self, item: &NodeId) -> Option<NodeId> {
        Document::parent(self, *item)
    }

    fn children(&self, item: &NodeId) -> Vec<NodeId> {
        Document::children(self, *item).to_vec()
    }

    fn next_sibling(&self, item: &NodeId) -> Option<NodeId> {
        Document::next_sibling(self, *item)
    }

    fn prev_sibling(&self, item: &NodeId) -> Option<NodeId> {
        Document::prev_sibling(self, *item)
    }

    fn eq(&self, a: &NodeId, b: &NodeId) -> bool {
        a == b
    }

    fn name(&self, item: &NodeId) -> String {
        self.tag(*item).unwrap_or("#text").to_string()
    }

    fn is_text(&self, item: &NodeId) -> bool {
        matches!(self.kind(*item), Some(NodeKind::Text { .. }))
    }

    fn text_content(&self, item: &NodeId) -> String {
        Document::text_content(self, *item)
    }

    fn first_child(&self, item: &NodeId) -> Option<NodeId> {
        Document::children(self, *item).first().copied()
    }

    fn last_child(&self, item: &NodeId) -> Option<NodeId> {
        Document::children(self, *item).last().copied()
    }
}

impl UniverseMut for Document {
    fn create_element(&mut self, tag: &str) -> NodeId {
        Document::create_element(self, tag)
    }

    fn empty(&mut self, item: &NodeId) {
        Document::empty(self, *item)
    }

    fn append(&mut self, parent: &NodeId, child: &NodeId) {
        self.append_child(*parent, *child)
    }

    fn remove(&mut self, item: &NodeId) {
        self.detach(*item)
    }
}

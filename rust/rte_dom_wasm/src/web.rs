//! Universe over the live browser DOM.

use rte_dom_core::{Universe, UniverseMut};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

/// Browser DOM binding. Nodes are owned by the page; this only holds the
/// document used to create new elements.
#[derive(Debug, Clone)]
pub struct WebUniverse {
    document: Document,
}

impl WebUniverse {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Universe for the document owning `node`, falling back to the
    /// window's document.
    pub fn for_node(node: &Node) -> Option<Self> {
        node.owner_document()
            .or_else(|| node.dyn_ref::<Document>().cloned())
            .or_else(|| web_sys::window()?.document())
            .map(Self::new)
    }
}

impl Universe for WebUniverse {
    type Item = Node;

    fn parent(&self, item: &Node) -> Option<Node> {
        item.parent_node()
    }

    fn children(&self, item: &Node) -> Vec<Node> {
        let list = item.child_nodes();
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn next_sibling(&self, item: &Node) -> Option<Node> {
        item.next_sibling()
    }

    fn prev_sibling(&self, item: &Node) -> Option<Node> {
        item.previous_sibling()
    }

    fn eq(&self, a: &Node, b: &Node) -> bool {
        a.is_same_node(Some(b))
    }

    fn name(&self, item: &Node) -> String {
        item.node_name().to_ascii_lowercase()
    }

    fn is_text(&self, item: &Node) -> bool {
        item.node_type() == Node::TEXT_NODE
    }

    fn is_element(&self, item: &Node) -> bool {
        item.node_type() == Node::ELEMENT_NODE
    }

    fn text_content(&self, item: &Node) -> String {
        item.text_content().unwrap_or_default()
    }

    fn first_child(&self, item: &Node) -> Option<Node> {
        item.first_child()
    }

    fn last_child(&self, item: &Node) -> Option<Node> {
        item.last_child()
    }
}

impl UniverseMut for WebUniverse {
    fn create_element(&mut self, tag: &str) -> Node {
        match self.document.create_element(tag) {
            Ok(el) => el.into(),
            Err(err) => {
                tracing::warn!(tag, error = ?err, "create_element failed, using an empty text node");
                self.document.create_text_node("").into()
            }
        }
    }

    fn empty(&mut self, item: &Node) {
        item.set_text_content(None);
    }

    fn append(&mut self, parent: &Node, child: &Node) {
        if let Err(err) = parent.append_child(child) {
            log_dom_error("append_child", &err);
        }
    }

    fn remove(&mut self, item: &Node) {
        if let Some(parent) = item.parent_node() {
            if let Err(err) = parent.remove_child(item) {
                log_dom_error("remove_child", &err);
            }
        }
    }
}

fn log_dom_error(op: &str, err: &JsValue) {
    tracing::warn!(op, error = ?err, "DOM mutation failed");
}

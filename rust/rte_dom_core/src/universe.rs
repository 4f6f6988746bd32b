//! Capability traits over a tree representation.
//!
//! A universe answers structural questions about nodes it does not own.
//! The arena [`Document`](crate::dom::Document) is one implementer, the
//! browser DOM binding in the wasm crate is another.

use std::fmt::Debug;

use crate::structure;

/// Read access to a tree: traversal, node properties and classification.
///
/// Classification defaults are driven by [`Universe::name`] and the tag
/// tables in [`structure`]; implementers only override them when their
/// tree has a better source of truth.
pub trait Universe {
    type Item: Clone + Debug;

    fn parent(&self, item: &Self::Item) -> Option<Self::Item>;
    fn children(&self, item: &Self::Item) -> Vec<Self::Item>;
    fn next_sibling(&self, item: &Self::Item) -> Option<Self::Item>;
    fn prev_sibling(&self, item: &Self::Item) -> Option<Self::Item>;

    /// Identity comparison, not structural equality.
    fn eq(&self, a: &Self::Item, b: &Self::Item) -> bool;

    /// Lower-case tag name, `#text` for text nodes.
    fn name(&self, item: &Self::Item) -> String;

    fn is_text(&self, item: &Self::Item) -> bool;

    /// Concatenated text of the node and all its descendants.
    fn text_content(&self, item: &Self::Item) -> String;

    fn is_element(&self, item: &Self::Item) -> bool {
        !self.is_text(item)
    }

    fn first_child(&self, item: &Self::Item) -> Option<Self::Item> {
        self.children(item).into_iter().next()
    }

    fn last_child(&self, item: &Self::Item) -> Option<Self::Item> {
        self.children(item).pop()
    }

    fn is_block(&self, item: &Self::Item) -> bool {
        self.is_element(item) && structure::is_block(&self.name(item))
    }

    fn is_empty_tag(&self, item: &Self::Item) -> bool {
        self.is_element(item) && structure::is_empty_tag(&self.name(item))
    }

    fn is_list(&self, item: &Self::Item) -> bool {
        self.is_element(item) && structure::is_list(&self.name(item))
    }

    fn is_li(&self, item: &Self::Item) -> bool {
        self.is_element(item) && structure::is_li(&self.name(item))
    }

    fn is_cell(&self, item: &Self::Item) -> bool {
        self.is_element(item) && structure::is_cell(&self.name(item))
    }

    /// Nearest proper ancestor matching `pred`.
    fn ancestor<F>(&self, item: &Self::Item, pred: F) -> Option<Self::Item>
    where
        F: Fn(&Self::Item) -> bool,
    {
        let mut current = self.parent(item);
        while let Some(node) = current {
            if pred(&node) {
                return Some(node);
            }
            current = self.parent(&node);
        }
        None
    }
}

/// Mutation primitives needed by content merging.
pub trait UniverseMut: Universe {
    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Self::Item;

    /// Detach every child of `item`.
    fn empty(&mut self, item: &Self::Item);

    /// Append `child` as the last child of `parent`, detaching it from
    /// its current parent first.
    fn append(&mut self, parent: &Self::Item, child: &Self::Item);

    /// Detach `item` from its parent. No-op for detached nodes.
    fn remove(&mut self, item: &Self::Item);

    fn append_all(&mut self, parent: &Self::Item, children: &[Self::Item]) {
        for child in children {
            self.append(parent, child);
        }
    }
}

//! Snapshot undo/redo for the arena document.

use std::collections::VecDeque;

use crate::dom::Document;

pub const DEFAULT_DEPTH: usize = 100;

/// Whole-document snapshots, bounded to `depth` undo steps.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Document>,
    redo_stack: Vec<Document>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }
}

impl History {
    pub fn with_depth(depth: usize) -> Self {
        Self { undo_stack: VecDeque::new(), redo_stack: Vec::new(), depth: depth.max(1) }
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Snapshot `current` before it is mutated. Drops the redo branch.
    pub fn record_before_change(&mut self, current: &Document) {
        if self.undo_stack.len() == self.depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(current.clone());
        self.redo_stack.clear();
    }

    /// Returns true if a change occurred.
    pub fn undo(&mut self, doc: &mut Document) -> bool {
        match self.undo_stack.pop_back() {
            Some(prev) => {
                self.redo_stack.push(std::mem::replace(doc, prev));
                true
            }
            None => false,
        }
    }

    /// Returns true if a change occurred.
    pub fn redo(&mut self, doc: &mut Document) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                self.undo_stack.push_back(std::mem::replace(doc, next));
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{inner_html, parse_fragment};

    fn html(doc: &Document) -> String {
        inner_html(doc, doc.root())
    }

    #[test]
    fn undo_then_redo_round_trips() {
        let mut doc = parse_fragment("<p>a</p>").unwrap();
        let mut history = History::default();
        history.record_before_change(&doc);
        let root = doc.root();
        let br = doc.create_element("br");
        doc.append_child(root, br);

        assert!(history.undo(&mut doc));
        assert_eq!(html(&doc), "<p>a</p>");
        assert!(history.redo(&mut doc));
        assert_eq!(html(&doc), "<p>a</p><br>");
        assert!(!history.redo(&mut doc));
    }

    #[test]
    fn depth_drops_oldest_snapshot() {
        let mut doc = Document::new();
        let mut history = History::with_depth(2);
        for _ in 0..3 {
            history.record_before_change(&doc);
            let root = doc.root();
            let hr = doc.create_element("hr");
            doc.append_child(root, hr);
        }
        assert!(history.undo(&mut doc));
        assert!(history.undo(&mut doc));
        assert!(!history.undo(&mut doc));
        assert_eq!(html(&doc), "<hr>");
    }

    #[test]
    fn new_change_clears_redo() {
        let mut doc = Document::new();
        let mut history = History::default();
        history.record_before_change(&doc);
        assert!(history.undo(&mut doc));
        assert!(history.can_redo());
        history.record_before_change(&doc);
        assert!(!history.can_redo());
    }
}

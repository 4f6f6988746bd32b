//! DOM traversal and table-cell content merging for rich-text editors.
//!
//! - `universe`: traits describing a tree and how to classify its nodes
//! - `dom`: arena document implementing those traits
//! - `gather`: directional walks and searches over any universe
//! - `dom_gather`: the gather operations bound to the arena document
//! - `table_content`: merging several cells' content into one
//! - `table`: rectangular merges addressed by row/column

pub mod cursor;
pub mod dom;
pub mod dom_gather;
pub mod error;
pub mod gather;
pub mod history;
pub mod html;
pub mod structure;
pub mod table;
pub mod table_content;
pub mod universe;

pub use dom::{Document, NodeId};
pub use dom_gather::DomGather;
pub use error::{Error, Result};
pub use table_content::{MergeOptions, SoleChildRule};
pub use universe::{Universe, UniverseMut};

use history::History;

#[derive(Debug, Default)]
pub struct EditorCore {
    pub doc: Document,
    pub history: History,
    pub options: MergeOptions,
}

impl EditorCore {
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn from_html(html: &str) -> Result<Self> {
        let doc = html::parse_fragment(html)?;
        Ok(Self { doc, ..Default::default() })
    }

    pub fn to_html(&self) -> String {
        html::inner_html(&self.doc, self.doc.root())
    }

    pub fn set_options_json(&mut self, json: &str) -> Result<()> {
        self.options = MergeOptions::from_json(json)?;
        Ok(())
    }

    pub fn tables(&self) -> Vec<NodeId> {
        self.doc.find_all(self.doc.root(), "table")
    }

    /// Merge a cell rectangle of the `table_idx`-th table. Returns the
    /// surviving cell.
    pub fn merge_cells(&mut self, table_idx: usize, sr: usize, sc: usize, er: usize, ec: usize) -> Result<NodeId> {
        let table = *self.tables().get(table_idx).ok_or(table::TableError::MissingTable(table_idx))?;
        let snapshot = self.doc.clone();
        let cell = table::merge_range(&mut self.doc, table, (sr, sc), (er, ec), &self.options)?;
        self.history.record_before_change(&snapshot);
        Ok(cell)
    }

    /// Merge arbitrary cells into the first one, leaving the others in place.
    pub fn merge_nodes(&mut self, cells: &[NodeId]) -> Result<()> {
        if let Some(stale) = cells.iter().find(|c| !self.doc.contains(**c)) {
            return Err(Error::UnknownNode(*stale));
        }
        if let Some(bad) = cells.iter().find(|c| !self.doc.is_cell(c)) {
            return Err(Error::NotACell(*bad));
        }
        self.history.record_before_change(&self.doc);
        table_content::merge(&mut self.doc, cells, &self.options);
        Ok(())
    }

    /// Leaf before `node`, staying inside `root`. `None` for handles the
    /// current document does not contain.
    pub fn before(&self, node: NodeId, root: NodeId) -> Option<NodeId> {
        self.knows(node, root)?;
        DomGather::new(&self.doc).before(node, |n| *n == root)
    }

    /// Leaf after `node`, staying inside `root`.
    pub fn after(&self, node: NodeId, root: NodeId) -> Option<NodeId> {
        self.knows(node, root)?;
        DomGather::new(&self.doc).after(node, |n| *n == root)
    }

    fn knows(&self, node: NodeId, root: NodeId) -> Option<()> {
        (self.doc.contains(node) && self.doc.contains(root)).then_some(())
    }

    pub fn undo(&mut self) -> bool { self.history.undo(&mut self.doc) }
    pub fn redo(&mut self) -> bool { self.history.redo(&mut self.doc) }
}

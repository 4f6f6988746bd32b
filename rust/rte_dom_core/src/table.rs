//! Rectangular cell merges on tables in the arena document.
//!
//! Cells are addressed by their physical position: row index among the
//! table's rows and cell index among that row's cells. Existing spans are
//! not expanded into a virtual grid.

use thiserror::Error;

use crate::dom::{Document, NodeId};
use crate::structure;
use crate::table_content::{self, MergeOptions};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("node is not a table")]
    NotATable,
    #[error("no table at index {0}")]
    MissingTable(usize),
    #[error("cell ({row}, {col}) is outside the table")]
    OutOfRange { row: usize, col: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableGrid {
    pub rows: Vec<Vec<NodeId>>,
}

impl TableGrid {
    /// Rows directly under `table` or under its row groups, skipping any
    /// nested tables.
    pub fn read(doc: &Document, table: NodeId) -> Result<Self, TableError> {
        if doc.tag(table) != Some("table") {
            return Err(TableError::NotATable);
        }
        let mut rows = Vec::new();
        for child in doc.children(table) {
            match doc.tag(*child) {
                Some("tr") => rows.push(row_cells(doc, *child)),
                Some("thead" | "tbody" | "tfoot") => {
                    for row in doc.children(*child) {
                        if doc.tag(*row) == Some("tr") {
                            rows.push(row_cells(doc, *row));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(Self { rows })
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<NodeId> {
        self.rows.get(row)?.get(col).copied()
    }
}

fn row_cells(doc: &Document, row: NodeId) -> Vec<NodeId> {
    doc.children(row)
        .iter()
        .copied()
        .filter(|c| doc.tag(*c).is_some_and(structure::is_cell))
        .collect()
}

fn span(doc: &Document, cell: NodeId, attr: &str) -> usize {
    doc.attr(cell, attr)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

/// Merge the rectangle between two corner cells into its top-left cell.
///
/// Content is merged with [`table_content::merge`], the covered cells are
/// removed and the survivor gets `colspan`/`rowspan` for the rectangle.
pub fn merge_range(
    doc: &mut Document,
    table: NodeId,
    start: (usize, usize),
    end: (usize, usize),
    options: &MergeOptions,
) -> Result<NodeId, TableError> {
    let grid = TableGrid::read(doc, table)?;
    let (r0, r1) = (start.0.min(end.0), start.0.max(end.0));
    let (c0, c1) = (start.1.min(end.1), start.1.max(end.1));

    let mut cells = Vec::new();
    for r in r0..=r1 {
        for c in c0..=c1 {
            cells.push(grid.cell(r, c).ok_or(TableError::OutOfRange { row: r, col: c })?);
        }
    }

    let width = c1 - c0 + 1;
    let colspan: usize = cells[..width].iter().map(|c| span(doc, *c, "colspan")).sum();
    let rowspan = r1 - r0 + 1;
    let target = cells[0];

    tracing::debug!(?target, rows = rowspan, cols = width, "merging table range");
    table_content::merge_and_remove(doc, &cells, options);

    set_span(doc, target, "colspan", colspan);
    set_span(doc, target, "rowspan", rowspan);
    Ok(target)
}

fn set_span(doc: &mut Document, cell: NodeId, attr: &str, value: usize) {
    if value > 1 {
        doc.set_attr(cell, attr, &value.to_string());
    } else {
        doc.remove_attr(cell, attr);
    }
}

//! Errors from the outer surfaces: parsing, table addressing, options and
//! node handles.
//!
//! Traversal and content merging never fail and do not appear here.

use thiserror::Error;

use crate::dom::NodeId;
use crate::html::ParseError;
use crate::table::TableError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("invalid merge options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("node {0:?} is not a table cell")]
    NotACell(NodeId),
    #[error("node {0:?} does not belong to this document")]
    UnknownNode(NodeId),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

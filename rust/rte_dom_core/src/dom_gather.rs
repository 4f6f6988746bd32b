//! Gather operations bound to the arena [`Document`].

use crate::dom::{Document, NodeId};
use crate::gather::{self, Direction, Gathered, Mode, Prune, Rule, Traverse, Walkers};

#[derive(Debug, Clone, Copy)]
pub struct DomGather<'a> {
    doc: &'a Document,
}

impl<'a> DomGather<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc }
    }

    pub fn gather<P, F, T>(&self, element: NodeId, prune: &P, transform: F) -> Gathered<T>
    where
        P: Prune<Document, T>,
        F: Fn(&Document, &NodeId) -> Vec<T>,
    {
        gather::gather(self.doc, &element, prune, transform)
    }

    pub fn before<R>(&self, element: NodeId, is_root: R) -> Option<NodeId>
    where
        R: Fn(&NodeId) -> bool,
    {
        gather::before(self.doc, &element, is_root)
    }

    pub fn after<R>(&self, element: NodeId, is_root: R) -> Option<NodeId>
    where
        R: Fn(&NodeId) -> bool,
    {
        gather::after(self.doc, &element, is_root)
    }

    pub fn seek_left<P, R>(&self, element: NodeId, predicate: P, is_root: R) -> Option<NodeId>
    where
        P: Fn(&NodeId) -> bool,
        R: Fn(&NodeId) -> bool,
    {
        gather::seek_left(self.doc, &element, predicate, is_root)
    }

    pub fn seek_right<P, R>(&self, element: NodeId, predicate: P, is_root: R) -> Option<NodeId>
    where
        P: Fn(&NodeId) -> bool,
        R: Fn(&NodeId) -> bool,
    {
        gather::seek_right(self.doc, &element, predicate, is_root)
    }

    pub fn walkers(&self) -> Walkers {
        gather::walkers()
    }

    /// Single walk step; `rules` defaults to [`gather::DEFAULT_RULES`].
    pub fn walk(
        &self,
        item: NodeId,
        mode: Mode,
        direction: Direction,
        rules: Option<&[Rule]>,
    ) -> Option<Traverse<NodeId>> {
        gather::walk(self.doc, &item, mode, direction, rules.unwrap_or(gather::DEFAULT_RULES))
    }
}

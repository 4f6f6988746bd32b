//! Directional tree walking over any [`Universe`].
//!
//! A walk is a sequence of single steps. Each step is taken in a [`Mode`]:
//! `Backtrack` climbs to the parent, `Sidestep` moves to the adjacent
//! sibling and `Advance` descends into the nearest child. A [`Rule`] says
//! which mode follows a successful step and which mode to retry from the
//! same node when the step is impossible.
//!
//! Nothing here mutates the tree, and every search reports absence as
//! `None`.

use crate::universe::Universe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sibling<U: Universe>(self, universe: &U, item: &U::Item) -> Option<U::Item> {
        match self {
            Direction::Left => universe.prev_sibling(item),
            Direction::Right => universe.next_sibling(item),
        }
    }

    /// The child nearest to where the walk came from: last child when
    /// walking left, first child when walking right.
    pub fn first<U: Universe>(self, universe: &U, item: &U::Item) -> Option<U::Item> {
        match self {
            Direction::Left => universe.last_child(item),
            Direction::Right => universe.first_child(item),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walkers {
    pub left: Direction,
    pub right: Direction,
}

pub fn walkers() -> Walkers {
    Walkers { left: Direction::Left, right: Direction::Right }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Backtrack,
    Sidestep,
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub current: Mode,
    pub next: Mode,
    pub fallback: Option<Mode>,
}

/// Depth-first document-order walking.
pub const DEFAULT_RULES: &[Rule] = &[
    Rule { current: Mode::Backtrack, next: Mode::Sidestep, fallback: None },
    Rule { current: Mode::Sidestep, next: Mode::Advance, fallback: Some(Mode::Backtrack) },
    Rule { current: Mode::Advance, next: Mode::Advance, fallback: Some(Mode::Sidestep) },
];

/// One step of a walk: where it landed and the mode for the next step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traverse<I> {
    pub item: I,
    pub mode: Mode,
}

/// Take a single step from `item`.
///
/// Returns `None` when neither the mode nor any of its fallbacks can move,
/// or when `rules` has no entry for `mode`.
pub fn walk<U: Universe>(
    universe: &U,
    item: &U::Item,
    mode: Mode,
    direction: Direction,
    rules: &[Rule],
) -> Option<Traverse<U::Item>> {
    step(universe, item, mode, direction, rules, rules.len())
}

fn step<U: Universe>(
    universe: &U,
    item: &U::Item,
    mode: Mode,
    direction: Direction,
    rules: &[Rule],
    budget: usize,
) -> Option<Traverse<U::Item>> {
    let rule = rules.iter().find(|r| r.current == mode)?;
    let moved = match rule.current {
        Mode::Backtrack => universe.parent(item),
        Mode::Sidestep => direction.sibling(universe, item),
        Mode::Advance => direction.first(universe, item),
    };
    match moved {
        Some(next) => Some(Traverse { item: next, mode: rule.next }),
        // Fallback chains in custom rules may cycle.
        None if budget > 0 => rule
            .fallback
            .and_then(|fb| step(universe, item, fb, direction, rules, budget - 1)),
        None => None,
    }
}

/// Lazy walk from a starting node, ending before the first node for which
/// `is_root` holds. Cloning a `Seek` restarts from the clone's position.
pub struct Seek<'a, U: Universe, R> {
    universe: &'a U,
    current: Option<Traverse<U::Item>>,
    direction: Direction,
    rules: &'a [Rule],
    is_root: R,
}

impl<'a, U, R> Seek<'a, U, R>
where
    U: Universe,
    R: Fn(&U::Item) -> bool,
{
    pub fn new(universe: &'a U, start: &U::Item, direction: Direction, is_root: R) -> Self {
        Self::with_rules(universe, start, direction, DEFAULT_RULES, is_root)
    }

    pub fn with_rules(
        universe: &'a U,
        start: &U::Item,
        direction: Direction,
        rules: &'a [Rule],
        is_root: R,
    ) -> Self {
        Self {
            universe,
            current: Some(Traverse { item: start.clone(), mode: Mode::Sidestep }),
            direction,
            rules,
            is_root,
        }
    }
}

impl<U, R> Clone for Seek<'_, U, R>
where
    U: Universe,
    R: Clone,
{
    fn clone(&self) -> Self {
        Self {
            universe: self.universe,
            current: self.current.clone(),
            direction: self.direction,
            rules: self.rules,
            is_root: self.is_root.clone(),
        }
    }
}

impl<U, R> Iterator for Seek<'_, U, R>
where
    U: Universe,
    R: Fn(&U::Item) -> bool,
{
    type Item = U::Item;

    fn next(&mut self) -> Option<U::Item> {
        let here = self.current.take()?;
        let next = walk(self.universe, &here.item, here.mode, self.direction, self.rules)?;
        if (self.is_root)(&next.item) {
            tracing::trace!(target: "rte_dom::gather", item = ?next.item, "seek reached root boundary");
            return None;
        }
        let item = next.item.clone();
        self.current = Some(next);
        Some(item)
    }
}

/// First node left of `item` (in reverse document order) matching
/// `predicate`, without crossing a root boundary.
pub fn seek_left<U, P, R>(universe: &U, item: &U::Item, predicate: P, is_root: R) -> Option<U::Item>
where
    U: Universe,
    P: Fn(&U::Item) -> bool,
    R: Fn(&U::Item) -> bool,
{
    Seek::new(universe, item, Direction::Left, is_root).find(|n| predicate(n))
}

/// First node right of `item` (in document order) matching `predicate`,
/// without crossing a root boundary.
pub fn seek_right<U, P, R>(universe: &U, item: &U::Item, predicate: P, is_root: R) -> Option<U::Item>
where
    U: Universe,
    P: Fn(&U::Item) -> bool,
    R: Fn(&U::Item) -> bool,
{
    Seek::new(universe, item, Direction::Right, is_root).find(|n| predicate(n))
}

/// The leaf immediately before `item`.
pub fn before<U, R>(universe: &U, item: &U::Item, is_root: R) -> Option<U::Item>
where
    U: Universe,
    R: Fn(&U::Item) -> bool,
{
    seek_left(universe, item, |n| is_leaf(universe, n), is_root)
}

/// The leaf immediately after `item`.
pub fn after<U, R>(universe: &U, item: &U::Item, is_root: R) -> Option<U::Item>
where
    U: Universe,
    R: Fn(&U::Item) -> bool,
{
    seek_right(universe, item, |n| is_leaf(universe, n), is_root)
}

pub fn is_leaf<U: Universe>(universe: &U, item: &U::Item) -> bool {
    universe.first_child(item).is_none()
}

/// Stop conditions for [`gather`].
pub trait Prune<U: Universe, T> {
    /// Whether climbing into `parent` is forbidden.
    fn stop(&self, universe: &U, parent: &U::Item) -> bool;

    /// Called for each sibling on the left side. `Some` ends the left side
    /// with the returned items.
    fn left(&self, universe: &U, sibling: &U::Item) -> Option<Vec<T>>;

    /// Same as [`Prune::left`] for the right side.
    fn right(&self, universe: &U, sibling: &U::Item) -> Option<Vec<T>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gathered<T> {
    /// Items left of the start, in document order.
    pub left: Vec<T>,
    /// Items right of the start, in document order.
    pub right: Vec<T>,
}

/// Collect transformed siblings on both sides of `item`, climbing through
/// ancestors until `prune` stops the walk.
pub fn gather<U, P, F, T>(universe: &U, item: &U::Item, prune: &P, transform: F) -> Gathered<T>
where
    U: Universe,
    P: Prune<U, T>,
    F: Fn(&U, &U::Item) -> Vec<T>,
{
    Gathered {
        left: traverse(universe, item, prune, &transform, Direction::Left),
        right: traverse(universe, item, prune, &transform, Direction::Right),
    }
}

fn traverse<U, P, F, T>(
    universe: &U,
    item: &U::Item,
    prune: &P,
    transform: &F,
    direction: Direction,
) -> Vec<T>
where
    U: Universe,
    P: Prune<U, T>,
    F: Fn(&U, &U::Item) -> Vec<T>,
{
    let mut chunks: Vec<Vec<T>> = Vec::new();
    let mut current = item.clone();
    loop {
        match direction.sibling(universe, &current) {
            Some(sibling) => {
                let pruned = match direction {
                    Direction::Left => prune.left(universe, &sibling),
                    Direction::Right => prune.right(universe, &sibling),
                };
                if let Some(last) = pruned {
                    chunks.push(last);
                    break;
                }
                chunks.push(transform(universe, &sibling));
                current = sibling;
            }
            None => match universe.parent(&current) {
                Some(parent) if !prune.stop(universe, &parent) => current = parent,
                _ => break,
            },
        }
    }
    if direction == Direction::Left {
        chunks.reverse();
    }
    chunks.into_iter().flatten().collect()
}

/// Pruner that keeps a gather inside the nearest block: it never climbs
/// into a block and ends a side at the first block sibling.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockPrune;

impl<U: Universe, T> Prune<U, T> for BlockPrune {
    fn stop(&self, universe: &U, parent: &U::Item) -> bool {
        universe.is_block(parent)
    }

    fn left(&self, universe: &U, sibling: &U::Item) -> Option<Vec<T>> {
        universe.is_block(sibling).then(Vec::new)
    }

    fn right(&self, universe: &U, sibling: &U::Item) -> Option<Vec<T>> {
        universe.is_block(sibling).then(Vec::new)
    }
}

/// Transform yielding every leaf under `item` (or `item` itself when it
/// is a leaf), in document order.
pub fn leaves<U: Universe>(universe: &U, item: &U::Item) -> Vec<U::Item> {
    let mut out = Vec::new();
    let mut stack = vec![item.clone()];
    while let Some(node) = stack.pop() {
        let children = universe.children(&node);
        if children.is_empty() {
            out.push(node);
        } else {
            stack.extend(children.into_iter().rev());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, NodeId};
    use crate::html::parse_fragment;

    fn text_node(doc: &Document, text: &str) -> NodeId {
        doc.descendants(doc.root())
            .into_iter()
            .find(|n| doc.text(*n) == Some(text))
            .unwrap()
    }

    fn texts(doc: &Document, nodes: &[NodeId]) -> Vec<String> {
        nodes
            .iter()
            .map(|n| doc.text(*n).map(str::to_string).unwrap_or_else(|| doc.tag(*n).unwrap_or_default().to_string()))
            .collect()
    }

    #[test]
    fn walk_sidesteps_then_advances() {
        let doc = parse_fragment("<p>a<b>b<i>c</i></b></p>").unwrap();
        let a = text_node(&doc, "a");
        let step = walk(&doc, &a, Mode::Sidestep, Direction::Right, DEFAULT_RULES).unwrap();
        assert_eq!(doc.tag(step.item), Some("b"));
        assert_eq!(step.mode, Mode::Advance);
        let step = walk(&doc, &step.item, step.mode, Direction::Right, DEFAULT_RULES).unwrap();
        assert_eq!(doc.text(step.item), Some("b"));
    }

    #[test]
    fn walk_falls_back_to_backtrack() {
        let doc = parse_fragment("<p><b>x</b></p>").unwrap();
        let x = text_node(&doc, "x");
        let step = walk(&doc, &x, Mode::Sidestep, Direction::Right, DEFAULT_RULES).unwrap();
        assert_eq!(doc.tag(step.item), Some("b"));
        assert_eq!(step.mode, Mode::Sidestep);
    }

    #[test]
    fn walk_without_rule_for_mode_is_none() {
        let doc = parse_fragment("<p>a b</p>").unwrap();
        let a = text_node(&doc, "a b");
        let rules = [Rule { current: Mode::Advance, next: Mode::Advance, fallback: None }];
        assert_eq!(walk(&doc, &a, Mode::Sidestep, Direction::Left, &rules), None);
    }

    #[test]
    fn cyclic_fallbacks_terminate() {
        let doc = parse_fragment("x").unwrap();
        let x = text_node(&doc, "x");
        let rules = [
            Rule { current: Mode::Sidestep, next: Mode::Sidestep, fallback: Some(Mode::Advance) },
            Rule { current: Mode::Advance, next: Mode::Advance, fallback: Some(Mode::Sidestep) },
        ];
        assert_eq!(walk(&doc, &x, Mode::Sidestep, Direction::Right, &rules), None);
    }

    #[test]
    fn after_finds_next_leaf_across_elements() {
        let doc = parse_fragment("<p>a<b><i>c</i></b>d</p>").unwrap();
        let a = text_node(&doc, "a");
        let root = doc.root();
        let found = after(&doc, &a, |n| *n == root).unwrap();
        assert_eq!(doc.text(found), Some("c"));
    }

    #[test]
    fn before_finds_previous_leaf_across_elements() {
        let doc = parse_fragment("<p>a<b>b<i>c</i></b>d</p>").unwrap();
        let d = text_node(&doc, "d");
        let root = doc.root();
        let found = before(&doc, &d, |n| *n == root).unwrap();
        assert_eq!(doc.text(found), Some("c"));
    }

    #[test]
    fn before_and_after_respect_root_boundary() {
        let doc = parse_fragment("<p>a</p><div><span>x</span></div><p>z</p>").unwrap();
        let x = text_node(&doc, "x");
        let is_div = |n: &NodeId| doc.tag(*n) == Some("div");
        assert_eq!(before(&doc, &x, is_div), None);
        assert_eq!(after(&doc, &x, is_div), None);

        let root = doc.root();
        assert_eq!(doc.text(after(&doc, &x, |n| *n == root).unwrap()), Some("z"));
    }

    #[test]
    fn seek_never_yields_past_root() {
        let doc = parse_fragment("<table><tr><td>1</td><td><b>2</b></td></tr></table>").unwrap();
        let two = text_node(&doc, "2");
        let visited: Vec<NodeId> = Seek::new(&doc, &two, Direction::Left, |n: &NodeId| doc.tag(*n) == Some("td")).collect();
        assert!(visited.iter().all(|n| doc.tag(*n) != Some("td")));
        assert_eq!(texts(&doc, &visited), vec!["b"]);
        assert_eq!(
            seek_left(&doc, &two, |n| doc.text(*n) == Some("1"), |n| doc.tag(*n) == Some("td")),
            None
        );
    }

    #[test]
    fn seek_right_matches_predicate() {
        let doc = parse_fragment("<p>a<span>b</span><br>c</p>").unwrap();
        let a = text_node(&doc, "a");
        let root = doc.root();
        let br = seek_right(&doc, &a, |n| doc.tag(*n) == Some("br"), |n| *n == root).unwrap();
        assert_eq!(doc.tag(br), Some("br"));
    }

    #[test]
    fn seek_is_restartable() {
        let doc = parse_fragment("<p>a<b>b</b>c</p>").unwrap();
        let a = text_node(&doc, "a");
        let root = doc.root();
        let mut seek = Seek::new(&doc, &a, Direction::Right, move |n: &NodeId| *n == root);
        assert_eq!(seek.next().and_then(|n| doc.tag(n)), Some("b"));
        let replay: Vec<NodeId> = seek.clone().collect();
        let rest: Vec<NodeId> = seek.collect();
        assert_eq!(replay, rest);
        // Backtracking revisits the parent before moving on.
        assert_eq!(texts(&doc, &rest), vec!["b", "b", "c", "p"]);
    }

    #[test]
    fn gather_collects_inline_run_within_block() {
        let doc = parse_fragment("<div><p>x</p>a<b>b</b><i>c</i>d<p>y</p></div>").unwrap();
        let c = text_node(&doc, "c");
        let got = gather(&doc, &c, &BlockPrune, leaves);
        assert_eq!(texts(&doc, &got.left), vec!["a", "b"]);
        assert_eq!(texts(&doc, &got.right), vec!["d"]);
    }

    #[test]
    fn gather_stops_at_block_parent() {
        let doc = parse_fragment("<p>a<b>b</b></p><p>c</p>").unwrap();
        let b = text_node(&doc, "b");
        let got = gather(&doc, &b, &BlockPrune, leaves);
        assert_eq!(texts(&doc, &got.left), vec!["a"]);
        assert!(got.right.is_empty());
    }

    #[test]
    fn walkers_expose_both_directions() {
        let w = walkers();
        assert_eq!(w.left, Direction::Left);
        assert_eq!(w.right, Direction::Right);
    }
}

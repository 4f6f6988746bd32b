//! Cursor positions: the deepest edge descendants of a node.

use crate::universe::Universe;

/// Deepest leftmost descendant of `item`, following first children.
/// `None` when `item` has no children.
pub fn first_cursor<U: Universe>(universe: &U, item: &U::Item) -> Option<U::Item> {
    descend(universe, item, |u, n| u.first_child(n))
}

/// Deepest rightmost descendant of `item`, following last children.
/// `None` when `item` has no children.
pub fn last_cursor<U: Universe>(universe: &U, item: &U::Item) -> Option<U::Item> {
    descend(universe, item, |u, n| u.last_child(n))
}

fn descend<U, F>(universe: &U, item: &U::Item, step: F) -> Option<U::Item>
where
    U: Universe,
    F: Fn(&U, &U::Item) -> Option<U::Item>,
{
    let mut current = step(universe, item)?;
    while let Some(next) = step(universe, &current) {
        current = next;
    }
    Some(current)
}

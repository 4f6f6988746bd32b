//! Content merging for table cells.
//!
//! When several cells become one, their children are moved into the first
//! cell. A cell whose content ends inline gets a trailing `<br>` so that
//! what used to be separate cells stays on separate lines.

use serde::{Deserialize, Serialize};

use crate::cursor::last_cursor;
use crate::universe::{Universe, UniverseMut};

/// When a cell with exactly one child contributes that child.
///
/// Cells with two or more children always contribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoleChildRule {
    /// Only a lone `<br>` in a cell whose trimmed text is empty.
    #[default]
    BlankLineBreak,
    /// Never. Single-child cells are dropped from the merge.
    Never,
    /// Always.
    Always,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub sole_child: SoleChildRule,
}

impl MergeOptions {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }
}

/// Move the content of `cells` into `cells[0]`.
///
/// The other cells keep their place in the tree; removing them is up to
/// the caller (see [`merge_and_remove`]). An empty slice is a no-op.
pub fn merge<U: UniverseMut>(universe: &mut U, cells: &[U::Item], options: &MergeOptions) {
    let Some(target) = cells.first() else {
        tracing::debug!("merge called without cells");
        return;
    };

    let mut content: Vec<U::Item> = Vec::new();
    let mut markers = 0_usize;
    for cell in cells {
        let children = universe.children(cell);
        if !contributes(universe, cell, &children, options) {
            continue;
        }
        let mark = needs_marker(universe, cell);
        content.extend(children);
        if mark {
            content.push(universe.create_element("br"));
            markers += 1;
        }
    }

    if content.is_empty() {
        content.push(universe.create_element("br"));
    }

    tracing::debug!(cells = cells.len(), nodes = content.len(), markers, "merging cell content");
    universe.empty(target);
    universe.append_all(target, &content);
}

/// [`merge`], then detach every cell but the first.
pub fn merge_and_remove<U: UniverseMut>(universe: &mut U, cells: &[U::Item], options: &MergeOptions) {
    merge(universe, cells, options);
    for cell in cells.iter().skip(1) {
        universe.remove(cell);
    }
}

fn contributes<U: Universe>(
    universe: &U,
    cell: &U::Item,
    children: &[U::Item],
    options: &MergeOptions,
) -> bool {
    if children.len() > 1 {
        return true;
    }
    match (options.sole_child, children) {
        (SoleChildRule::BlankLineBreak, [only]) => {
            is_br(universe, only) && universe.text_content(cell).trim().is_empty()
        }
        (SoleChildRule::Always, [_]) => true,
        _ => false,
    }
}

/// Whether the cell's content ends inline and needs a `<br>` to keep its
/// line separate from the next cell's content.
fn needs_marker<U: Universe>(universe: &U, cell: &U::Item) -> bool {
    let Some(edge) = last_cursor(universe, cell) else {
        return false;
    };
    let Some(parent) = universe.parent(&edge) else {
        return false;
    };
    let ends_line = sibling_is_block(universe, &edge)
        || is_list_item(universe, &parent)
        || is_br(universe, &edge)
        || (universe.is_block(&parent) && !universe.eq(cell, &parent));
    !ends_line
}

/// A following block, or a following void element other than `img`,
/// already breaks the line.
fn sibling_is_block<U: Universe>(universe: &U, item: &U::Item) -> bool {
    universe.next_sibling(item).is_some_and(|right| {
        universe.is_block(&right)
            || (universe.is_empty_tag(&right) && universe.name(&right) != "img")
    })
}

fn is_list_item<U: Universe>(universe: &U, item: &U::Item) -> bool {
    universe.is_li(item) || universe.ancestor(item, |n| universe.is_list(n)).is_some()
}

fn is_br<U: Universe>(universe: &U, item: &U::Item) -> bool {
    universe.is_element(item) && universe.name(item) == "br"
}

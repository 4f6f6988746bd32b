//! Tag classification used by the universe defaults.
//!
//! Names are expected in lower case; `Universe::name` normalizes them.

const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "div", "dl", "dt",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

const EMPTY_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

const LISTS: &[&str] = &["ol", "ul", "dl"];

const LIST_ITEMS: &[&str] = &["li", "dd", "dt"];

const CELLS: &[&str] = &["td", "th"];

pub fn is_block(name: &str) -> bool {
    BLOCKS.contains(&name)
}

/// Elements that never have children (void elements).
pub fn is_empty_tag(name: &str) -> bool {
    EMPTY_TAGS.contains(&name)
}

pub fn is_list(name: &str) -> bool {
    LISTS.contains(&name)
}

pub fn is_li(name: &str) -> bool {
    LIST_ITEMS.contains(&name)
}

pub fn is_cell(name: &str) -> bool {
    CELLS.contains(&name)
}

pub fn is_br(name: &str) -> bool {
    name == "br"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_blocks() {
        assert!(is_block("td"));
        assert!(is_block("th"));
        assert!(is_cell("th"));
        assert!(!is_cell("tr"));
    }

    #[test]
    fn inline_tags_are_not_blocks() {
        for tag in ["span", "b", "em", "a", "img", "br"] {
            assert!(!is_block(tag), "{tag} classified as block");
        }
    }

    #[test]
    fn hr_is_both_block_and_empty() {
        assert!(is_block("hr"));
        assert!(is_empty_tag("hr"));
    }
}

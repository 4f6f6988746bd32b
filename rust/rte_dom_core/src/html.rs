//! HTML fragment import/export for the arena document.
//!
//! The parser is deliberately small: it understands elements, quoted and
//! bare attributes, text, comments and void elements. It does not apply
//! the HTML5 tree-construction rules (no implied `tbody`, no foster
//! parenting), so fixtures are parsed exactly as written.

use thiserror::Error;

use crate::dom::{Document, NodeId, NodeKind, ROOT_NAME};
use crate::structure;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end tag </{tag}> at byte {offset}")]
    UnexpectedEndTag { tag: String, offset: usize },
    #[error("element <{tag}> is never closed")]
    UnclosedElement { tag: String },
    #[error("malformed tag at byte {offset}")]
    MalformedTag { offset: usize },
}

/// Parse `input` into a fresh document whose root holds the fragment.
pub fn parse_fragment(input: &str) -> Result<Document, ParseError> {
    let mut doc = Document::new();
    let root = doc.root();
    parse_into(&mut doc, root, input)?;
    Ok(doc)
}

/// Parse `input` and append the resulting nodes to `parent`.
pub fn parse_into(doc: &mut Document, parent: NodeId, input: &str) -> Result<(), ParseError> {
    let bytes = input.as_bytes();
    let mut stack: Vec<NodeId> = vec![parent];
    let mut idx = 0_usize;

    while idx < bytes.len() {
        if bytes[idx] != b'<' {
            let next = find_byte(bytes, idx, b'<').unwrap_or(bytes.len());
            push_text(doc, &stack, &input[idx..next]);
            idx = next;
            continue;
        }

        if starts_with(bytes, idx, b"<!--") {
            idx = find_seq(bytes, idx + 4, b"-->").map(|p| p + 3).unwrap_or(bytes.len());
            continue;
        }

        if starts_with(bytes, idx, b"<!") || starts_with(bytes, idx, b"<?") {
            idx = find_byte(bytes, idx, b'>').map(|p| p + 1).unwrap_or(bytes.len());
            continue;
        }

        if starts_with(bytes, idx, b"</") {
            let end = find_byte(bytes, idx, b'>').ok_or(ParseError::MalformedTag { offset: idx })?;
            let tag = input[idx + 2..end].trim().to_ascii_lowercase();
            close_element(doc, &mut stack, &tag, idx)?;
            idx = end + 1;
            continue;
        }

        match bytes.get(idx + 1) {
            Some(b) if b.is_ascii_alphabetic() => {
                let (tag, next) = parse_start_tag(input, idx)?;
                let el = doc.create_element(&tag.name);
                for (k, v) in &tag.attrs {
                    doc.set_attr(el, k, v);
                }
                if let Some(top) = stack.last() {
                    doc.append_child(*top, el);
                }
                if !tag.self_closing && !structure::is_empty_tag(&tag.name) {
                    stack.push(el);
                }
                idx = next;
            }
            _ => {
                // A lone '<' is text.
                let next = find_byte(bytes, idx + 1, b'<').unwrap_or(bytes.len());
                push_text(doc, &stack, &input[idx..next]);
                idx = next;
            }
        }
    }

    if stack.len() > 1 {
        let tag = stack
            .last()
            .and_then(|n| doc.tag(*n))
            .unwrap_or_default()
            .to_string();
        return Err(ParseError::UnclosedElement { tag });
    }
    Ok(())
}

fn push_text(doc: &mut Document, stack: &[NodeId], raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = html_escape::decode_html_entities(raw);
    let text = doc.create_text(&decoded);
    if let Some(top) = stack.last() {
        doc.append_child(*top, text);
    }
}

fn close_element(
    doc: &Document,
    stack: &mut Vec<NodeId>,
    tag: &str,
    offset: usize,
) -> Result<(), ParseError> {
    // Index 0 is the fragment parent and is never closed by markup.
    let pos = stack
        .iter()
        .skip(1)
        .rposition(|n| doc.tag(*n) == Some(tag))
        .map(|p| p + 1);
    match pos {
        Some(p) => {
            stack.truncate(p);
            Ok(())
        }
        None if structure::is_empty_tag(tag) => Ok(()),
        None => Err(ParseError::UnexpectedEndTag { tag: tag.to_string(), offset }),
    }
}

#[derive(Debug, Default)]
struct StartTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
}

fn parse_start_tag(input: &str, start: usize) -> Result<(StartTag, usize), ParseError> {
    let bytes = input.as_bytes();
    let malformed = ParseError::MalformedTag { offset: start };
    let mut idx = start + 1;

    let name_start = idx;
    while idx < bytes.len() && is_name_char(bytes[idx]) {
        idx += 1;
    }
    let mut tag = StartTag {
        name: input[name_start..idx].to_ascii_lowercase(),
        ..Default::default()
    };

    loop {
        idx = skip_spaces(bytes, idx);
        match bytes.get(idx) {
            None => return Err(malformed),
            Some(b'>') => return Ok((tag, idx + 1)),
            Some(b'/') if bytes.get(idx + 1) == Some(&b'>') => {
                tag.self_closing = true;
                return Ok((tag, idx + 2));
            }
            Some(b'/') => idx += 1,
            Some(_) => {
                let attr_start = idx;
                while idx < bytes.len()
                    && !bytes[idx].is_ascii_whitespace()
                    && !matches!(bytes[idx], b'=' | b'>' | b'/')
                {
                    idx += 1;
                }
                let key = input[attr_start..idx].to_ascii_lowercase();
                idx = skip_spaces(bytes, idx);
                let mut value = String::new();
                if bytes.get(idx) == Some(&b'=') {
                    idx = skip_spaces(bytes, idx + 1);
                    let (raw, next) = match bytes.get(idx) {
                        Some(q @ (b'"' | b'\'')) => {
                            let close = find_byte(bytes, idx + 1, *q).ok_or(ParseError::MalformedTag { offset: start })?;
                            (&input[idx + 1..close], close + 1)
                        }
                        Some(_) => {
                            let value_start = idx;
                            while idx < bytes.len()
                                && !bytes[idx].is_ascii_whitespace()
                                && bytes[idx] != b'>'
                            {
                                idx += 1;
                            }
                            (&input[value_start..idx], idx)
                        }
                        None => return Err(malformed),
                    };
                    value = html_escape::decode_html_entities(raw).into_owned();
                    idx = next;
                }
                if !key.is_empty() {
                    tag.attrs.push((key, value));
                }
            }
        }
    }
}

/// Serialize `id` including its own tag. The document root serializes as
/// its children only.
pub fn to_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

pub fn inner_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    for child in doc.children(id) {
        write_node(doc, *child, &mut out);
    }
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    let Some(kind) = doc.kind(id) else {
        return;
    };
    match kind {
        NodeKind::Text { text } => out.push_str(&html_escape::encode_text(text)),
        NodeKind::Element { tag, .. } if tag == ROOT_NAME => {
            for child in doc.children(id) {
                write_node(doc, *child, out);
            }
        }
        NodeKind::Element { tag, attrs } => {
            out.push('<');
            out.push_str(tag);
            for (k, v) in attrs {
                out.push_str(&format!(" {}=\"{}\"", k, html_escape::encode_double_quoted_attribute(v)));
            }
            out.push('>');
            if structure::is_empty_tag(tag) {
                return;
            }
            for child in doc.children(id) {
                write_node(doc, *child, out);
            }
            out.push_str(&format!("</{}>", tag));
        }
    }
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

fn skip_spaces(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

fn starts_with(bytes: &[u8], idx: usize, prefix: &[u8]) -> bool {
    bytes.get(idx..).is_some_and(|rest| rest.starts_with(prefix))
}

fn find_byte(bytes: &[u8], from: usize, needle: u8) -> Option<usize> {
    bytes.get(from..)?.iter().position(|b| *b == needle).map(|p| p + from)
}

fn find_seq(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    bytes
        .get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

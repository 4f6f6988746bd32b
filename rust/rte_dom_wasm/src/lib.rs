use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;
use web_sys::Node;

use rte_dom_core::{cursor, gather, table_content, EditorCore, MergeOptions};

pub mod web;

pub use web::WebUniverse;

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn universe_for(node: &Node) -> Result<WebUniverse, JsValue> {
    WebUniverse::for_node(node).ok_or_else(|| JsValue::from_str("node has no owning document"))
}

/// Wrap a JS predicate. Results are read for truthiness; a throw counts
/// as false and is logged.
fn predicate(f: &Function) -> impl Fn(&Node) -> bool + '_ {
    move |n: &Node| match f.call1(&JsValue::NULL, n) {
        Ok(v) => v.is_truthy(),
        Err(err) => {
            tracing::warn!(error = ?err, "predicate threw, treating as false");
            false
        }
    }
}

fn options_from(json: Option<String>) -> Result<MergeOptions, JsValue> {
    MergeOptions::from_json(json.as_deref().unwrap_or_default()).map_err(to_js)
}

/// Merge the content of `cells` into the first cell. The other cells are
/// left in the DOM.
#[wasm_bindgen(js_name = mergeCells)]
pub fn merge_cells(cells: Array, options_json: Option<String>) -> Result<(), JsValue> {
    let options = options_from(options_json)?;
    let nodes = cells
        .iter()
        .map(|v| v.dyn_into::<Node>().map_err(|_| JsValue::from_str("cells must be DOM nodes")))
        .collect::<Result<Vec<Node>, JsValue>>()?;
    let Some(first) = nodes.first() else {
        return Ok(());
    };
    let mut universe = universe_for(first)?;
    table_content::merge(&mut universe, &nodes, &options);
    Ok(())
}

#[wasm_bindgen(js_name = seekLeft)]
pub fn seek_left(node: Node, matches: &Function, is_root: &Function) -> Result<Option<Node>, JsValue> {
    let universe = universe_for(&node)?;
    Ok(gather::seek_left(&universe, &node, predicate(matches), predicate(is_root)))
}

#[wasm_bindgen(js_name = seekRight)]
pub fn seek_right(node: Node, matches: &Function, is_root: &Function) -> Result<Option<Node>, JsValue> {
    let universe = universe_for(&node)?;
    Ok(gather::seek_right(&universe, &node, predicate(matches), predicate(is_root)))
}

#[wasm_bindgen]
pub fn before(node: Node, is_root: &Function) -> Result<Option<Node>, JsValue> {
    let universe = universe_for(&node)?;
    Ok(gather::before(&universe, &node, predicate(is_root)))
}

#[wasm_bindgen]
pub fn after(node: Node, is_root: &Function) -> Result<Option<Node>, JsValue> {
    let universe = universe_for(&node)?;
    Ok(gather::after(&universe, &node, predicate(is_root)))
}

#[wasm_bindgen(js_name = lastCursor)]
pub fn last_cursor(node: Node) -> Result<Option<Node>, JsValue> {
    let universe = universe_for(&node)?;
    Ok(cursor::last_cursor(&universe, &node))
}

#[wasm_bindgen]
pub struct Editor {
    core: EditorCore,
}

#[wasm_bindgen]
impl Editor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Editor {
        Editor { core: EditorCore::new_empty() }
    }

    pub fn from_html(html: String) -> Result<Editor, JsValue> {
        let core = EditorCore::from_html(&html).map_err(to_js)?;
        Ok(Editor { core })
    }

    pub fn to_html(&self) -> String { self.core.to_html() }

    pub fn set_options(&mut self, options_json: String) -> Result<(), JsValue> {
        self.core.set_options_json(&options_json).map_err(to_js)
    }

    pub fn merge_cells(&mut self, table_idx: u32, sr: u32, sc: u32, er: u32, ec: u32) -> Result<(), JsValue> {
        self.core
            .merge_cells(table_idx as usize, sr as usize, sc as usize, er as usize, ec as usize)
            .map(|_| ())
            .map_err(to_js)
    }

    pub fn undo(&mut self) -> bool { self.core.undo() }
    pub fn redo(&mut self) -> bool { self.core.redo() }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

//! The walking and merging code against a minimal non-arena tree.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rte_dom_core::gather::{after, before, seek_right};
use rte_dom_core::table_content::{merge, MergeOptions};
use rte_dom_core::{Universe, UniverseMut};

#[derive(Debug)]
struct Node {
    name: String,
    text: String,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<Rc<Node>>>,
}

#[derive(Debug, Clone)]
struct Handle(Rc<Node>);

fn el(name: &str, children: Vec<Handle>) -> Handle {
    let node = Handle(Rc::new(Node {
        name: name.into(),
        text: String::new(),
        parent: RefCell::new(Weak::new()),
        children: RefCell::new(Vec::new()),
    }));
    for child in children {
        *child.0.parent.borrow_mut() = Rc::downgrade(&node.0);
        node.0.children.borrow_mut().push(child.0);
    }
    node
}

fn text(t: &str) -> Handle {
    Handle(Rc::new(Node {
        name: "#text".into(),
        text: t.into(),
        parent: RefCell::new(Weak::new()),
        children: RefCell::new(Vec::new()),
    }))
}

struct RcUniverse;

impl RcUniverse {
    fn sibling(&self, item: &Handle, offset: isize) -> Option<Handle> {
        let parent = self.parent(item)?;
        let siblings = parent.0.children.borrow();
        let pos = siblings.iter().position(|c| Rc::ptr_eq(c, &item.0))? as isize + offset;
        usize::try_from(pos).ok().and_then(|p| siblings.get(p)).cloned().map(Handle)
    }
}

impl Universe for RcUniverse {
    type Item = Handle;

    fn parent(&self, item: &Handle) -> Option<Handle> {
        item.0.parent.borrow().upgrade().map(Handle)
    }

    fn children(&self, item: &Handle) -> Vec<Handle> {
        item.0.children.borrow().iter().cloned().map(Handle).collect()
    }

    fn next_sibling(&self, item: &Handle) -> Option<Handle> {
        self.sibling(item, 1)
    }

    fn prev_sibling(&self, item: &Handle) -> Option<Handle> {
        self.sibling(item, -1)
    }

    fn eq(&self, a: &Handle, b: &Handle) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    fn name(&self, item: &Handle) -> String {
        item.0.name.clone()
    }

    fn is_text(&self, item: &Handle) -> bool {
        item.0.name == "#text"
    }

    fn text_content(&self, item: &Handle) -> String {
        if self.is_text(item) {
            return item.0.text.clone();
        }
        self.children(item).iter().map(|c| self.text_content(c)).collect()
    }
}

impl UniverseMut for RcUniverse {
    fn create_element(&mut self, tag: &str) -> Handle {
        el(tag, Vec::new())
    }

    fn empty(&mut self, item: &Handle) {
        for child in item.0.children.borrow_mut().drain(..) {
            *child.parent.borrow_mut() = Weak::new();
        }
    }

    fn append(&mut self, parent: &Handle, child: &Handle) {
        self.remove(child);
        *child.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
        parent.0.children.borrow_mut().push(child.0.clone());
    }

    fn remove(&mut self, item: &Handle) {
        if let Some(parent) = self.parent(item) {
            parent.0.children.borrow_mut().retain(|c| !Rc::ptr_eq(c, &item.0));
        }
        *item.0.parent.borrow_mut() = Weak::new();
    }
}

fn names(u: &RcUniverse, item: &Handle) -> Vec<String> {
    u.children(item)
        .iter()
        .map(|c| if u.is_text(c) { c.0.text.clone() } else { u.name(c) })
        .collect()
}

#[test]
fn merge_works_on_any_universe() {
    let mut u = RcUniverse;
    let td1 = el("td", vec![text("a"), el("b", vec![text("b")])]);
    let td2 = el("td", vec![el("p", vec![text("c")]), el("p", vec![text("d")])]);
    let td3 = el("td", Vec::new());
    let row = el("tr", vec![td1.clone(), td2.clone(), td3.clone()]);

    merge(&mut u, &[td1.clone(), td2.clone(), td3.clone()], &MergeOptions::default());

    assert_eq!(names(&u, &td1), vec!["a", "b", "br", "p", "p"]);
    assert!(u.children(&td2).is_empty());
    assert_eq!(u.children(&row).len(), 3);
}

#[test]
fn empty_cells_merge_to_single_break() {
    let mut u = RcUniverse;
    let td1 = el("td", Vec::new());
    let td2 = el("td", Vec::new());
    let _row = el("tr", vec![td1.clone(), td2.clone()]);
    merge(&mut u, &[td1.clone(), td2], &MergeOptions::default());
    assert_eq!(names(&u, &td1), vec!["br"]);
}

#[test]
fn walking_works_on_any_universe() {
    let u = RcUniverse;
    let a = text("a");
    let c = text("c");
    let cell = el("td", vec![a.clone(), el("span", vec![text("b")]), c.clone()]);
    let _row = el("tr", vec![cell.clone()]);

    let is_cell = |n: &Handle| u.eq(n, &cell);
    let next = after(&u, &a, is_cell).unwrap();
    assert_eq!(u.text_content(&next), "b");
    let prev = before(&u, &c, is_cell).unwrap();
    assert_eq!(u.text_content(&prev), "b");
    assert!(after(&u, &c, is_cell).is_none());

    let found = seek_right(&u, &a, |n| u.text_content(n) == "c", is_cell).unwrap();
    assert!(u.eq(&found, &c));
}

//! Structural selectors over the live DOM.
//!
//! Elements in the main document resolve through a single `querySelector`
//! on the CSS form; elements inside a shadow root are re-found by walking
//! child indices from the shadow root's top level, since a document query
//! cannot see into it.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlCollection, Node, ShadowRoot};

use nano_core::selector::{self, ElementTree};
use nano_core::StructuralSelector;

/// The tree an element lives in.
#[derive(Clone, Debug)]
pub enum TreeRoot {
    Document(Document),
    Shadow(ShadowRoot),
}

impl TreeRoot {
    /// Root of `element`'s tree; `None` if it is detached.
    pub fn of(element: &Element) -> Option<Self> {
        let root = element.get_root_node();
        if let Some(doc) = root.dyn_ref::<Document>() {
            return Some(TreeRoot::Document(doc.clone()));
        }
        root.dyn_ref::<ShadowRoot>()
            .map(|shadow| TreeRoot::Shadow(shadow.clone()))
    }

    fn top_level(&self) -> HtmlCollection {
        match self {
            TreeRoot::Document(doc) => doc.children(),
            TreeRoot::Shadow(shadow) => shadow.children(),
        }
    }
}

impl ElementTree for TreeRoot {
    type Element = Element;

    fn parent(&self, element: &Element) -> Option<Element> {
        element.parent_element()
    }

    fn index_in_parent(&self, element: &Element) -> u32 {
        let mut index = 1;
        let mut sibling = element.previous_element_sibling();
        while let Some(s) = sibling {
            index += 1;
            sibling = s.previous_element_sibling();
        }
        index
    }

    fn nth_child(&self, parent: Option<&Element>, index: u32) -> Option<Element> {
        let children = match parent {
            Some(p) => p.children(),
            None => self.top_level(),
        };
        children.item(index.checked_sub(1)?)
    }

    fn same_element(&self, a: &Element, b: &Element) -> bool {
        let b: &Node = b;
        a.is_same_node(Some(b))
    }
}

/// Selector for `element` plus the tree it is relative to.
pub fn compute(element: &Element) -> Option<(TreeRoot, StructuralSelector)> {
    let root = TreeRoot::of(element)?;
    let selector = selector::compute(&root, element);
    Some((root, selector))
}

pub fn resolve(root: &TreeRoot, selector: &StructuralSelector) -> Option<Element> {
    match root {
        TreeRoot::Document(doc) => doc.query_selector(&selector.to_string()).ok().flatten(),
        TreeRoot::Shadow(_) => selector::resolve(root, selector),
    }
}

/// Resolve, accepting only the very element that was read from.
pub fn resolve_same(
    root: &TreeRoot,
    selector: &StructuralSelector,
    expected: &Element,
) -> Option<Element> {
    resolve(root, selector).filter(|found| root.same_element(found, expected))
}

//! Finding what the user wants to edit.
//!
//! Priority, evaluated once per gesture:
//! 1. the deep active element, if it is a plain text `<input>`/`<textarea>`
//! 2. the deep active element, if it is contenteditable
//! 3. a non-empty ranged page selection (no element to write back to)
//! 4. nothing

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use nano_core::{Located, TargetError};

use crate::control::TextControl;
use crate::cursor::{document_selection, read_all_text, selected_text};
use crate::dom_sync::DomTarget;
use crate::selector;

/// Focused element, following focus into open shadow roots.
pub fn deep_active_element(document: &Document) -> Option<Element> {
    let mut active = document.active_element()?;
    while let Some(shadow) = active.shadow_root() {
        match shadow.active_element() {
            Some(inner) => active = inner,
            None => break,
        }
    }
    Some(active)
}

/// Locate the edit target in `document`.
///
/// `Ok(None)` means there is nothing to edit and no request should be sent.
pub fn locate(document: &Document) -> Result<Option<Located<DomTarget>>, TargetError> {
    if let Some(active) = deep_active_element(document) {
        if let Some(control) = TextControl::from_element(&active) {
            let Some((root, selector)) = selector::compute(&active) else {
                return Ok(None);
            };
            let text = control.value();
            let selection = control.selection();
            tracing::trace!(
                target: "nano::locator",
                %selector,
                ?selection,
                "located text control"
            );
            return Ok(Some(Located::element(
                DomTarget::control(control, selection, root, selector),
                text,
            )));
        }

        if let Some(editable) = active
            .dyn_ref::<HtmlElement>()
            .filter(|el| el.is_content_editable())
        {
            let Some((root, selector)) = selector::compute(&active) else {
                return Ok(None);
            };
            let selection = document_selection(document)?;
            let text = read_all_text(&selection, editable)?;
            tracing::trace!(target: "nano::locator", %selector, "located contenteditable");
            return Ok(Some(Located::element(
                DomTarget::editable(editable.clone(), root, selector),
                text,
            )));
        }
    }

    let selection = document_selection(document)?;
    Ok(selected_text(&selection).map(|text| {
        tracing::trace!(target: "nano::locator", len = text.len(), "located page selection");
        Located::selection(text)
    }))
}

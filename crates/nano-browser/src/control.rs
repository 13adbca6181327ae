//! `<input>` and `<textarea>` as one editable text control.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement};

use nano_core::{SelectionDirection, TextSelection};

/// Input types that are plain text and support the selection API.
const SELECTABLE_INPUT_TYPES: &[&str] = &["text", "search", "url", "tel", "password"];

#[derive(Clone, Debug)]
pub enum TextControl {
    Input(HtmlInputElement),
    TextArea(HtmlTextAreaElement),
}

impl TextControl {
    /// `None` for anything that is not a writable plain-text control.
    pub fn from_element(element: &Element) -> Option<Self> {
        if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
            let kind = input.type_().to_ascii_lowercase();
            if !SELECTABLE_INPUT_TYPES.contains(&kind.as_str())
                || input.read_only()
                || input.disabled()
            {
                return None;
            }
            return Some(TextControl::Input(input.clone()));
        }
        let area = element.dyn_ref::<HtmlTextAreaElement>()?;
        if area.read_only() || area.disabled() {
            return None;
        }
        Some(TextControl::TextArea(area.clone()))
    }

    pub fn element(&self) -> &Element {
        match self {
            TextControl::Input(i) => i,
            TextControl::TextArea(t) => t,
        }
    }

    pub fn value(&self) -> String {
        match self {
            TextControl::Input(i) => i.value(),
            TextControl::TextArea(t) => t.value(),
        }
    }

    pub fn set_value(&self, value: &str) {
        match self {
            TextControl::Input(i) => i.set_value(value),
            TextControl::TextArea(t) => t.set_value(value),
        }
    }

    /// Current selection; a caret at 0 if the browser won't say.
    pub fn selection(&self) -> TextSelection {
        let (start, end, direction) = match self {
            TextControl::Input(i) => (
                i.selection_start(),
                i.selection_end(),
                i.selection_direction(),
            ),
            TextControl::TextArea(t) => (
                t.selection_start(),
                t.selection_end(),
                t.selection_direction(),
            ),
        };
        let start = start.ok().flatten().unwrap_or(0);
        let end = end.ok().flatten().unwrap_or(start);
        let direction = direction
            .ok()
            .flatten()
            .and_then(|d| d.parse().ok())
            .unwrap_or(SelectionDirection::None);
        TextSelection::new(start, end, direction)
    }

    pub fn set_selection(&self, selection: &TextSelection) -> Result<(), JsValue> {
        let TextSelection {
            start,
            end,
            direction,
        } = *selection;
        match self {
            TextControl::Input(i) => {
                i.set_selection_range_with_direction(start, end, direction.as_str())
            }
            TextControl::TextArea(t) => {
                t.set_selection_range_with_direction(start, end, direction.as_str())
            }
        }
    }
}

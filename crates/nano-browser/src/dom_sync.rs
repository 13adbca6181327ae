//! Writing editor output back into the page.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlDocument, HtmlElement};

use nano_core::{EditTarget, StructuralSelector, TargetError, TargetKind, TextSelection};

use crate::control::TextControl;
use crate::cursor::{document_selection, select_contents};
use crate::events::{dispatch_input, dispatch_paste, next_tick};
use crate::selector::{TreeRoot, resolve_same};

#[derive(Clone, Debug)]
enum Held {
    /// The control and the selection it had when read.
    Control(TextControl, TextSelection),
    Editable(HtmlElement),
}

/// An element the locator read text from, and how to find it again.
#[derive(Clone, Debug)]
pub struct DomTarget {
    element: Held,
    root: TreeRoot,
    selector: StructuralSelector,
}

impl DomTarget {
    pub fn control(
        control: TextControl,
        selection: TextSelection,
        root: TreeRoot,
        selector: StructuralSelector,
    ) -> Self {
        Self {
            element: Held::Control(control, selection),
            root,
            selector,
        }
    }

    pub fn editable(element: HtmlElement, root: TreeRoot, selector: StructuralSelector) -> Self {
        Self {
            element: Held::Editable(element),
            root,
            selector,
        }
    }

    pub fn dom_element(&self) -> &Element {
        match &self.element {
            Held::Control(c, _) => c.element(),
            Held::Editable(e) => e,
        }
    }

    /// Selection captured at read time, for text controls.
    pub fn saved_selection(&self) -> Option<TextSelection> {
        match &self.element {
            Held::Control(_, sel) => Some(*sel),
            Held::Editable(_) => None,
        }
    }

    /// Check the element is still where it was read from.
    fn reresolve(&self) -> Result<(), TargetError> {
        resolve_same(&self.root, &self.selector, self.dom_element())
            .map(|_| ())
            .ok_or(TargetError::Detached)
    }
}

impl EditTarget for DomTarget {
    fn kind(&self) -> TargetKind {
        match self.element {
            Held::Control(..) => TargetKind::TextControl,
            Held::Editable(_) => TargetKind::ContentEditable,
        }
    }

    async fn restore(&self, output: &str) -> Result<(), TargetError> {
        self.reresolve()?;
        match &self.element {
            Held::Control(control, selection) => restore_control(control, selection, output),
            Held::Editable(element) => restore_editable(element, output).await,
        }
    }
}

/// Set the value, put the selection back, tell the page.
pub fn restore_control(
    control: &TextControl,
    selection: &TextSelection,
    output: &str,
) -> Result<(), TargetError> {
    control.set_value(output);
    if let Err(e) = control.set_selection(selection) {
        tracing::debug!("restoring selection failed: {:?}", e);
    }
    dispatch_input(control.element(), output)
        .map_err(|e| format!("dispatching input failed: {:?}", e))?;
    Ok(())
}

/// Select the element's contents, yield, then paste `output` over them.
pub async fn restore_editable(element: &HtmlElement, output: &str) -> Result<(), TargetError> {
    let document = element
        .owner_document()
        .ok_or_else(|| TargetError::from("element has no document"))?;
    if let Err(e) = element.focus() {
        tracing::debug!("focusing editable failed: {:?}", e);
    }
    let selection = document_selection(&document)?;
    select_contents(&selection, element)?;

    next_tick()
        .await
        .map_err(|e| format!("yielding failed: {:?}", e))?;

    let unhandled =
        dispatch_paste(element, output).map_err(|e| format!("dispatching paste failed: {:?}", e))?;
    if unhandled {
        // Nobody consumed the paste; let the browser insert it into the
        // still-selected contents.
        insert_text(&document, output);
    }

    crate::clipboard::write_text_best_effort(output).await;
    Ok(())
}

/// `document.execCommand("insertText")`, which keeps the page's undo stack.
fn insert_text(document: &web_sys::Document, text: &str) {
    let Some(html) = document.dyn_ref::<HtmlDocument>() else {
        return;
    };
    match html.exec_command_with_show_ui_and_value("insertText", false, text) {
        Ok(true) => {}
        Ok(false) => tracing::debug!("insertText was not executed"),
        Err(e) => tracing::debug!("insertText failed: {:?}", e),
    }
}

//! Page selection handling for contenteditable targets.
//!
//! Reading a contenteditable's text goes through the Selection API
//! (select all children, stringify), which clobbers whatever the user had
//! selected. `SavedSelection` puts it back.

use web_sys::{Document, Node, Range, Selection};

use nano_core::TargetError;

/// Clones of every range in a selection.
pub struct SavedSelection {
    ranges: Vec<Range>,
}

impl SavedSelection {
    pub fn save(selection: &Selection) -> Self {
        let ranges = (0..selection.range_count())
            .filter_map(|i| selection.get_range_at(i).ok())
            .map(|r| r.clone_range())
            .collect();
        Self { ranges }
    }

    pub fn restore(&self, selection: &Selection) -> Result<(), TargetError> {
        selection
            .remove_all_ranges()
            .map_err(|e| format!("remove_all_ranges failed: {:?}", e))?;
        for range in &self.ranges {
            selection
                .add_range(range)
                .map_err(|e| format!("add_range failed: {:?}", e))?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

/// The document's selection object.
pub fn document_selection(document: &Document) -> Result<Selection, TargetError> {
    document
        .get_selection()
        .map_err(|e| format!("get_selection failed: {:?}", e))?
        .ok_or_else(|| "no selection object".into())
}

/// Select all of `node`'s children.
pub fn select_contents(selection: &Selection, node: &Node) -> Result<(), TargetError> {
    selection
        .select_all_children(node)
        .map_err(|e| format!("select_all_children failed: {:?}", e).into())
}

/// Text of everything inside `node`, leaving the user's selection as it was.
pub fn read_all_text(selection: &Selection, node: &Node) -> Result<String, TargetError> {
    let saved = SavedSelection::save(selection);
    select_contents(selection, node)?;
    let text = String::from(selection.to_string());
    saved.restore(selection)?;
    Ok(text)
}

/// Non-empty text of a ranged (not caret) selection.
pub fn selected_text(selection: &Selection) -> Option<String> {
    if selection.type_() != "Range" {
        return None;
    }
    let text = String::from(selection.to_string());
    (!text.is_empty()).then_some(text)
}

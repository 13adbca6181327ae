//! Selection state captured from text controls.

use std::fmt;
use std::str::FromStr;

/// Direction of a text control selection, as `selectionDirection` reports it.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum SelectionDirection {
    Forward,
    Backward,
    #[default]
    None,
}

impl SelectionDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionDirection::Forward => "forward",
            SelectionDirection::Backward => "backward",
            SelectionDirection::None => "none",
        }
    }
}

impl FromStr for SelectionDirection {
    type Err = std::convert::Infallible;

    /// Unknown strings map to `None`, which browsers treat as forward.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "forward" => SelectionDirection::Forward,
            "backward" => SelectionDirection::Backward,
            _ => SelectionDirection::None,
        })
    }
}

impl fmt::Display for SelectionDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection of an `<input>` or `<textarea>`, in UTF-16 code units.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub struct TextSelection {
    pub start: u32,
    pub end: u32,
    pub direction: SelectionDirection,
}

impl TextSelection {
    pub fn new(start: u32, end: u32, direction: SelectionDirection) -> Self {
        Self {
            start,
            end,
            direction,
        }
    }

    pub fn caret(offset: u32) -> Self {
        Self::new(offset, offset, SelectionDirection::None)
    }

    pub fn is_caret(&self) -> bool {
        self.start == self.end
    }
}

/// What kind of thing the locator found.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// `<input>` or `<textarea>`
    TextControl,
    ContentEditable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse() {
        assert_eq!(
            "backward".parse::<SelectionDirection>().unwrap(),
            SelectionDirection::Backward
        );
        assert_eq!(
            "sideways".parse::<SelectionDirection>().unwrap(),
            SelectionDirection::None
        );
        assert_eq!(SelectionDirection::Forward.to_string(), "forward");
    }

    #[test]
    fn test_caret() {
        assert!(TextSelection::caret(3).is_caret());
        assert!(!TextSelection::new(0, 5, SelectionDirection::Forward).is_caret());
    }
}

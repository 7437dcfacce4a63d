// SPDX-License-Identifier: MPL-2.0
//! Global cursor affordance shown while dragging.

use iced::mouse;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    Grab,
    Grabbing,
}

impl CursorStyle {
    #[must_use]
    pub fn interaction(self) -> mouse::Interaction {
        match self {
            CursorStyle::Default => mouse::Interaction::None,
            CursorStyle::Grab => mouse::Interaction::Grab,
            CursorStyle::Grabbing => mouse::Interaction::Grabbing,
        }
    }
}

/// The cursor could not be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorError(pub String);

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cursor unavailable: {}", self.0)
    }
}

impl std::error::Error for CursorError {}

/// Something able to change the window-wide cursor.
///
/// Callers treat failures as best effort and carry on.
pub trait CursorAffordance {
    fn set_cursor(&mut self, style: CursorStyle) -> Result<(), CursorError>;
}

/// Cursor applied to the whole window through the root mouse area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowCursor {
    style: CursorStyle,
}

impl WindowCursor {
    #[must_use]
    pub fn style(&self) -> CursorStyle {
        self.style
    }

    #[must_use]
    pub fn interaction(&self) -> mouse::Interaction {
        self.style.interaction()
    }
}

impl CursorAffordance for WindowCursor {
    fn set_cursor(&mut self, style: CursorStyle) -> Result<(), CursorError> {
        self.style = style;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_cursor_tracks_style() {
        let mut cursor = WindowCursor::default();
        cursor.set_cursor(CursorStyle::Grabbing).unwrap();
        assert_eq!(cursor.interaction(), mouse::Interaction::Grabbing);
        cursor.set_cursor(CursorStyle::Default).unwrap();
        assert_eq!(cursor.interaction(), mouse::Interaction::None);
    }
}

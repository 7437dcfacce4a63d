// SPDX-License-Identifier: MPL-2.0
//! Drag state for the floating webcam preview.
//!
//! A drag records the grab offset between the pointer and the preview anchor
//! once, at press time. Every move then places the anchor at
//! `pointer - grab_offset`, computed from the absolute pointer position so
//! rounding never accumulates over a long drag.
//!
//! The preview is drawn inside the window. While a drag runs the stored
//! position may leave that area; when the drag ends it settles on the drawn
//! position, so the next grab offset is taken from what the user sees.

use super::cursor::{CursorAffordance, CursorStyle};
use super::listener::ViewportListener;
use iced::{Point, Size, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
}

impl PointerKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            PointerKind::Mouse => "mouse",
            PointerKind::Touch => "touch",
        }
    }
}

/// An active drag gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub kind: PointerKind,
    pub grab_offset: Vector,
}

/// Owns the preview position and the drag gesture moving it.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    position: Point,
    session: Option<DragSession>,
    listener: ViewportListener,
    /// Largest anchor keeping the preview inside the window, once known.
    max_anchor: Option<Size>,
}

impl DragController {
    #[must_use]
    pub fn new(position: Point) -> Self {
        Self {
            position,
            session: None,
            listener: ViewportListener::default(),
            max_anchor: None,
        }
    }

    /// Places the preview at its starting position for a fresh mount.
    pub fn mount(&mut self, position: Point) {
        self.position = self.clamp(position);
        if self.session.take().is_some() {
            self.listener.stop();
        }
    }

    /// Starts a drag at `pointer`.
    ///
    /// A mouse drag also switches to the grabbing cursor and attaches the
    /// viewport listener. A drag still in progress is ended first.
    pub fn begin_drag(
        &mut self,
        pointer: Point,
        kind: PointerKind,
        cursor: &mut dyn CursorAffordance,
    ) {
        if self.session.is_some() {
            self.end_drag(cursor);
        }

        self.session = Some(DragSession {
            kind,
            grab_offset: pointer - self.position,
        });

        if kind == PointerKind::Mouse {
            let _ = cursor.set_cursor(CursorStyle::Grabbing);
            self.listener.start();
        }
    }

    /// Follows the pointer. Returns the new position, or `None` when no drag
    /// is active.
    pub fn on_pointer_move(&mut self, pointer: Point) -> Option<Point> {
        let session = self.session?;
        self.position = pointer - session.grab_offset;
        Some(self.position)
    }

    /// Ends the drag, restoring the cursor and detaching the listener for
    /// mouse input. Does nothing when no drag is active.
    pub fn end_drag(&mut self, cursor: &mut dyn CursorAffordance) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.position = self.visible_position();

        if session.kind == PointerKind::Mouse {
            let _ = cursor.set_cursor(CursorStyle::Default);
            self.listener.stop();
        }
    }

    /// Tears everything down when the preview leaves the screen.
    pub fn release(&mut self, cursor: &mut dyn CursorAffordance) {
        self.end_drag(cursor);
        // A listener can only be attached by a mouse session, which
        // `end_drag` has detached; stopping again is a no-op.
        self.listener.stop();
    }

    /// Restricts the drawn anchor to `(0, 0)..=max_anchor`. Outside a drag
    /// the stored position moves inside the new range at once.
    pub fn set_max_anchor(&mut self, max_anchor: Size) {
        self.max_anchor = Some(Size::new(
            max_anchor.width.max(0.0),
            max_anchor.height.max(0.0),
        ));
        if self.session.is_none() {
            self.position = self.visible_position();
        }
    }

    /// Stored anchor, which follows the pointer exactly during a drag.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Anchor at which the preview is drawn.
    #[must_use]
    pub fn visible_position(&self) -> Point {
        self.clamp(self.position)
    }

    fn clamp(&self, position: Point) -> Point {
        match self.max_anchor {
            Some(max) => Point::new(
                position.x.clamp(0.0, max.width),
                position.y.clamp(0.0, max.height),
            ),
            None => position,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the active drag, if any, uses `kind`.
    #[must_use]
    pub fn is_dragging_with(&self, kind: PointerKind) -> bool {
        self.session.is_some_and(|session| session.kind == kind)
    }

    #[must_use]
    pub fn listener(&self) -> &ViewportListener {
        &self.listener
    }
}

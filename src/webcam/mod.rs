// SPDX-License-Identifier: MPL-2.0
//! Floating, draggable webcam preview shown during a test.

pub mod capture;
pub mod cursor;
pub mod drag;
pub mod listener;
pub mod preview;
pub mod stream;

pub use capture::{CameraFrame, CaptureConfig, CaptureEvent};
pub use cursor::{CursorAffordance, CursorError, CursorStyle, WindowCursor};
pub use drag::{DragController, DragSession, PointerKind};
pub use listener::ViewportListener;
pub use preview::PreviewState;
pub use stream::{FallbackStreamSlot, StreamAvailability, StreamHandle, StreamSources};

use crate::error::CameraError;
use iced::{event, mouse, Point, Subscription};

#[derive(Debug, Clone)]
pub enum Message {
    /// Press on the preview, in window coordinates.
    PointerPressed { position: Point, kind: PointerKind },
    /// Pointer position during a drag, in window coordinates.
    PointerMoved { position: Point, kind: PointerKind },
    PointerReleased(PointerKind),
    Capture(CaptureEvent),
}

/// Outcomes the application reacts to (diagnostics, violations).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    DragStarted { kind: PointerKind, position: Point },
    DragEnded,
    CameraStarted(StreamHandle),
    CameraLost(CameraError),
}

/// Applies `message` to the preview.
pub fn update(
    state: &mut PreviewState,
    message: Message,
    cursor: &mut dyn CursorAffordance,
) -> Option<Event> {
    let event = match message {
        Message::PointerPressed { position, kind } => {
            state.controller_mut().begin_drag(position, kind, cursor);
            Some(Event::DragStarted { kind, position })
        }
        Message::PointerMoved { position, kind } => {
            if state.controller().is_dragging_with(kind) {
                state.controller_mut().on_pointer_move(position);
            }
            None
        }
        Message::PointerReleased(kind) => {
            if state.controller().is_dragging_with(kind) {
                state.controller_mut().end_drag(cursor);
                Some(Event::DragEnded)
            } else {
                None
            }
        }
        Message::Capture(CaptureEvent::Started(handle)) => {
            state.on_stream_started(handle.clone());
            Some(Event::CameraStarted(handle))
        }
        Message::Capture(CaptureEvent::Frame(frame)) => {
            state.on_frame(frame);
            None
        }
        Message::Capture(CaptureEvent::Error(error)) => {
            state.on_stream_lost();
            Some(Event::CameraLost(error))
        }
    };

    state.refresh();
    event
}

/// Camera capture while mounted, plus the viewport listener while a mouse
/// drag is in progress.
pub fn subscription(state: &PreviewState) -> Subscription<Message> {
    let capture = match state.capture_config() {
        Some(config) => capture::subscription(config.clone()).map(Message::Capture),
        None => Subscription::none(),
    };

    let viewport = if state.controller().listener().is_attached() {
        viewport_listener()
    } else {
        Subscription::none()
    };

    Subscription::batch([capture, viewport])
}

/// Window-wide mouse tracking, so a drag keeps following the pointer once
/// it leaves the preview.
fn viewport_listener() -> Subscription<Message> {
    event::listen_with(|event, _status, _window| match event {
        iced::Event::Mouse(mouse::Event::CursorMoved { position }) => {
            Some(Message::PointerMoved {
                position,
                kind: PointerKind::Mouse,
            })
        }
        iced::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
            Some(Message::PointerReleased(PointerKind::Mouse))
        }
        _ => None,
    })
}

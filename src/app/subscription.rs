// SPDX-License-Identifier: MPL-2.0
//! Event subscriptions for the application.

use super::{Message, Screen};
use crate::webcam::{self, PreviewState};
use iced::keyboard::{self, key};
use iced::{event, time, window, Subscription};
use std::time::Duration;

/// Tick period for diagnostics draining and toast expiry.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Window focus and size changes, and the diagnostics export shortcut (F12).
pub fn create_event_subscription() -> Subscription<Message> {
    event::listen_with(|event, status, _window_id| match event {
        event::Event::Window(
            window::Event::Opened { size, .. } | window::Event::Resized(size),
        ) => Some(Message::WindowResized(size)),
        event::Event::Window(window::Event::Focused) => {
            Some(Message::WindowFocusChanged { focused: true })
        }
        event::Event::Window(window::Event::Unfocused) => {
            Some(Message::WindowFocusChanged { focused: false })
        }
        event::Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(key::Named::F12),
            ..
        }) if status == event::Status::Ignored => Some(Message::ExportDiagnostics),
        _ => None,
    })
}

pub fn create_tick_subscription() -> Subscription<Message> {
    time::every(TICK_INTERVAL).map(Message::Tick)
}

/// Camera capture and drag tracking, only while the test screen is shown.
pub fn create_webcam_subscription(screen: Screen, preview: &PreviewState) -> Subscription<Message> {
    if screen == Screen::TestDetails {
        webcam::subscription(preview).map(Message::Webcam)
    } else {
        Subscription::none()
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Notifications inform the candidate about failed requests, camera
//! problems and submissions without blocking the screen.
//!
//! - [`notification`] - `Notification` with severity levels
//! - [`manager`] - `Manager` for queuing and lifecycle
//! - [`toast`] - rendering
//!
//! Success and info toasts last ~3s, warnings ~5s, errors until dismissed.
//! At most 3 are visible; the rest wait in a queue.

mod manager;
mod notification;
mod toast;

pub use manager::{Manager, Message as NotificationMessage};
pub use notification::{Notification, NotificationId, Severity};
pub use toast::Toast;

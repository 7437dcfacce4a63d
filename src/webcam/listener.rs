// SPDX-License-Identifier: MPL-2.0
//! Viewport-scoped pointer listener.
//!
//! While a mouse drag is active the preview must keep receiving cursor moves
//! and the button release even when the pointer leaves its bounds. The
//! application turns this state into a window-wide event subscription: the
//! subscription exists exactly while [`ViewportListener::is_attached`] holds.

/// Lifecycle of the window-wide move/release listener.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportListener {
    attached: bool,
    attach_count: u32,
    detach_count: u32,
}

impl ViewportListener {
    /// Attaches the listener. Returns `false` if it was already attached.
    pub fn start(&mut self) -> bool {
        if self.attached {
            return false;
        }
        self.attached = true;
        self.attach_count += 1;
        true
    }

    /// Detaches the listener. Returns `false` if nothing was attached, so
    /// calling it twice never detaches twice.
    pub fn stop(&mut self) -> bool {
        if !self.attached {
            return false;
        }
        self.attached = false;
        self.detach_count += 1;
        true
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Number of times the listener has been attached.
    #[must_use]
    pub fn attach_count(&self) -> u32 {
        self.attach_count
    }

    /// Number of times the listener has been detached.
    #[must_use]
    pub fn detach_count(&self) -> u32 {
        self.detach_count
    }
}

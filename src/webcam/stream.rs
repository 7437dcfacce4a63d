// SPDX-License-Identifier: MPL-2.0
//! Camera stream handles and the availability they imply.
//!
//! The preview can be fed by three sources: the stream it started itself,
//! a stream shared by the surrounding test session, and a process-wide
//! fallback published by whichever component last opened the camera. The
//! widget never mutates them; it only asks whether any is present.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

static NEXT_STREAM_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug)]
struct StreamInfo {
    id: u64,
    device: String,
}

/// Opaque, cheaply cloneable reference to an open camera stream.
#[derive(Debug, Clone)]
pub struct StreamHandle {
    info: Arc<StreamInfo>,
}

impl StreamHandle {
    #[must_use]
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            info: Arc::new(StreamInfo {
                id: NEXT_STREAM_ID.fetch_add(1, Ordering::Relaxed),
                device: device.into(),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.info.id
    }

    #[must_use]
    pub fn device(&self) -> &str {
        &self.info.device
    }
}

impl PartialEq for StreamHandle {
    fn eq(&self, other: &Self) -> bool {
        self.info.id == other.info.id
    }
}

impl Eq for StreamHandle {}

/// Process-wide fallback stream, shared by reference.
///
/// Created once by the application and handed to every component that
/// needs it, rather than living in a global.
#[derive(Debug, Clone, Default)]
pub struct FallbackStreamSlot {
    inner: Arc<RwLock<Option<StreamHandle>>>,
}

impl FallbackStreamSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, handle: StreamHandle) {
        if let Ok(mut slot) = self.inner.write() {
            *slot = Some(handle);
        }
    }

    /// Clears the slot if it still holds `handle`.
    pub fn clear_if(&self, handle: &StreamHandle) {
        if let Ok(mut slot) = self.inner.write() {
            if slot.as_ref() == Some(handle) {
                *slot = None;
            }
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<StreamHandle> {
        self.inner.read().ok().and_then(|slot| slot.clone())
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.inner.read().map(|slot| slot.is_some()).unwrap_or(false)
    }
}

/// The three stream sources visible to the preview.
#[derive(Debug, Clone, Default)]
pub struct StreamSources {
    pub local: Option<StreamHandle>,
    pub shared: Option<StreamHandle>,
    pub fallback: FallbackStreamSlot,
}

impl StreamSources {
    #[must_use]
    pub fn new(fallback: FallbackStreamSlot) -> Self {
        Self {
            local: None,
            shared: None,
            fallback,
        }
    }

    /// Whether any of the three sources holds a stream.
    #[must_use]
    pub fn has_stream(&self) -> bool {
        self.local.is_some() || self.shared.is_some() || self.fallback.is_present()
    }
}

/// What the preview can show right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamAvailability {
    /// No source holds a stream.
    NoStream,
    /// A stream exists but no frame has been decoded yet.
    AwaitingFrames,
    /// Frames are arriving.
    Live,
}

impl StreamAvailability {
    #[must_use]
    pub fn resolve(has_stream: bool, frame_observed: bool) -> Self {
        match (has_stream, frame_observed) {
            (false, _) => StreamAvailability::NoStream,
            (true, false) => StreamAvailability::AwaitingFrames,
            (true, true) => StreamAvailability::Live,
        }
    }

    /// The canvas beneath the live surface is visible.
    #[must_use]
    pub fn shows_fallback(self) -> bool {
        self == StreamAvailability::AwaitingFrames
    }

    /// The "no camera stream" overlay is visible.
    #[must_use]
    pub fn shows_placeholder(self) -> bool {
        self == StreamAvailability::NoStream
    }
}

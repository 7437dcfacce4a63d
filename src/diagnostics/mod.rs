// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for collecting and exporting activity reports.
//!
//! Components send events through a cheap, cloneable [`DiagnosticsHandle`];
//! the UI loop drains them into a memory-bounded [`CircularBuffer`] on every
//! tick. The buffer can be exported as a JSON report into the data directory.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: Timestamped event with a [`DiagnosticEventKind`]
//! - [`DiagnosticsCollector`]: Owns the buffer and the receiving channel end

mod buffer;
mod collector;
mod events;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle, ExportError};
pub use events::{AppStateEvent, DiagnosticEvent, DiagnosticEventKind, UserAction};

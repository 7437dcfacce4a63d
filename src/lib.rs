// SPDX-License-Identifier: MPL-2.0
//! `proctor_lens` is a proctored examination client built with the Iced GUI
//! framework.
//!
//! It lists the assessments a candidate is shortlisted for, runs a test
//! section while a draggable webcam preview floats above the screen, and
//! reports focus and camera violations to the test service.

pub mod api;
pub mod app;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exam;
pub mod i18n;
pub mod session;
pub mod ui;
pub mod webcam;

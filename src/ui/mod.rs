// SPDX-License-Identifier: MPL-2.0
//! User interface building blocks shared by the screens.

pub mod design_tokens;
pub mod notifications;
pub mod styles;
pub mod theming;

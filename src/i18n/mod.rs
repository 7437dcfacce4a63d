// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support for the application.
//!
//! Translations are Fluent `.ftl` files embedded at build time. The active
//! locale is the first available one among the `--lang` argument, the
//! `general.language` setting and the OS locale, falling back to `en-US`.
//! Keys missing from the active locale are looked up in `en-US`.

pub mod fluent;

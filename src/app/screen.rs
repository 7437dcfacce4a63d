// SPDX-License-Identifier: MPL-2.0
//! Screen enumeration for application navigation.

use crate::exam::Route;

/// Screens the candidate can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Examination,
    TestDetails,
}

impl From<&Route> for Screen {
    fn from(route: &Route) -> Self {
        match route {
            Route::Examination => Screen::Examination,
            Route::TestDetails { .. } => Screen::TestDetails,
        }
    }
}

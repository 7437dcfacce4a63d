// SPDX-License-Identifier: MPL-2.0
//! Candidate examinations: which ones are open, and taking one.

pub mod record;
pub mod resolver;
pub mod test_details;
pub mod view;

pub use record::{AssessmentRecord, ExamCard};
pub use resolver::{EligibilityResolver, MountOutcome, Phase, RequestToken, Resolution, Route};
pub use test_details::{
    SubmissionToken, TestDetailsState, TestPhase, ViolationKind, ViolationReport,
};

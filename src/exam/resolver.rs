// SPDX-License-Identifier: MPL-2.0
//! Eligibility resolution for the examination list.
//!
//! Each mount of the examination screen runs one pass:
//!
//! ```text
//! mount ──► no candidate ─────────────────────────► NotShortlisted
//!   │
//!   ├──► unreadable candidate record ─────────────► FetchError
//!   │
//!   └──► Fetching(token) ──► request failed ──────► FetchError
//!                        ├─► usable records ──────► Eligible
//!                        └─► empty / blank data ──► NotShortlisted
//! ```
//!
//! Every mount takes a fresh [`RequestToken`]. A response is only applied
//! when its token matches the fetch in flight, so a slow response from an
//! earlier mount can never overwrite a newer one.

use super::record::{is_blank_record, AssessmentRecord, ExamCard};
use crate::error::ApiError;
use crate::session::SessionStore;
use serde_json::Value;

/// Navigation targets reachable from the examination list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Examination,
    TestDetails { question_set_id: String },
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Route::Examination => "/Candidate-Dashboard/Examination".to_string(),
            Route::TestDetails { question_set_id } => format!(
                "/Candidate-Dashboard/Examination/TestDetails/{}",
                question_set_id
            ),
        }
    }
}

/// Terminal display of one mount.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    NotShortlisted,
    Eligible(Vec<ExamCard>),
    FetchError,
}

impl Resolution {
    /// Cards to render; placeholders are a single disabled card.
    #[must_use]
    pub fn cards(&self) -> Vec<ExamCard> {
        match self {
            Resolution::NotShortlisted => vec![ExamCard::not_shortlisted()],
            Resolution::Eligible(cards) => cards.clone(),
            Resolution::FetchError => vec![ExamCard::fetch_error()],
        }
    }

    /// Short label used in diagnostics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Resolution::NotShortlisted => "not_shortlisted",
            Resolution::Eligible(_) => "eligible",
            Resolution::FetchError => "fetch_error",
        }
    }
}

/// Identifies one fetch issued by [`EligibilityResolver::mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Idle,
    Fetching(RequestToken),
    Resolved(Resolution),
}

/// What the caller must do after [`EligibilityResolver::mount`].
#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    /// Nothing to fetch; the display is final.
    Resolved(Resolution),
    /// Fetch the candidate's assessments and hand the result to
    /// [`EligibilityResolver::complete`] with this token.
    Fetch {
        token: RequestToken,
        candidate_id: String,
    },
}

#[derive(Debug)]
pub struct EligibilityResolver {
    phase: Phase,
    next_token: u64,
}

impl Default for EligibilityResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl EligibilityResolver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            next_token: 0,
        }
    }

    /// Starts a new pass, superseding any fetch still in flight.
    pub fn mount(&mut self, session: &SessionStore) -> MountOutcome {
        self.next_token += 1;
        let token = RequestToken(self.next_token);

        match session.candidate() {
            Ok(Some(candidate)) => {
                self.phase = Phase::Fetching(token);
                MountOutcome::Fetch {
                    token,
                    candidate_id: candidate.id,
                }
            }
            Ok(None) => self.settle(Resolution::NotShortlisted),
            Err(_) => self.settle(Resolution::FetchError),
        }
    }

    fn settle(&mut self, resolution: Resolution) -> MountOutcome {
        self.phase = Phase::Resolved(resolution.clone());
        MountOutcome::Resolved(resolution)
    }

    /// Applies a fetch result. Returns `false` and changes nothing when the
    /// token does not belong to the fetch in flight.
    pub fn complete(&mut self, token: RequestToken, result: Result<Value, ApiError>) -> bool {
        if self.phase != Phase::Fetching(token) {
            return false;
        }
        self.phase = Phase::Resolved(classify(result));
        true
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn resolution(&self) -> Option<&Resolution> {
        match &self.phase {
            Phase::Resolved(resolution) => Some(resolution),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_fetching(&self) -> bool {
        matches!(self.phase, Phase::Fetching(_))
    }
}

/// Maps a service response onto a terminal display.
#[must_use]
pub fn classify(result: Result<Value, ApiError>) -> Resolution {
    let records = match result {
        Ok(Value::Array(records)) => records,
        Ok(_) => return Resolution::NotShortlisted,
        Err(_) => return Resolution::FetchError,
    };

    match records.as_slice() {
        [] => Resolution::NotShortlisted,
        [only] if is_blank_record(only) => Resolution::NotShortlisted,
        _ => Resolution::Eligible(
            records
                .iter()
                .map(|value| ExamCard::from(AssessmentRecord::from_value(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exam::record::{FETCH_ERROR_TITLE, NOT_SHORTLISTED_TITLE};
    use crate::session::CANDIDATE_KEY;
    use serde_json::json;

    fn session_with(raw: &str) -> SessionStore {
        let mut session = SessionStore::new();
        session.set(CANDIDATE_KEY, raw);
        session
    }

    fn fetch_token(outcome: MountOutcome) -> RequestToken {
        match outcome {
            MountOutcome::Fetch { token, .. } => token,
            other => panic!("expected a fetch, got {:?}", other),
        }
    }

    #[test]
    fn no_candidate_is_not_shortlisted() {
        let mut resolver = EligibilityResolver::new();
        let outcome = resolver.mount(&SessionStore::new());

        assert_eq!(outcome, MountOutcome::Resolved(Resolution::NotShortlisted));
        let cards = resolver.resolution().unwrap().cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, NOT_SHORTLISTED_TITLE);
        assert!(!cards[0].is_active);
    }

    #[test]
    fn unreadable_candidate_is_fetch_error() {
        let mut resolver = EligibilityResolver::new();
        let outcome = resolver.mount(&session_with("{broken"));
        assert_eq!(outcome, MountOutcome::Resolved(Resolution::FetchError));
    }

    #[test]
    fn candidate_triggers_fetch_with_its_id() {
        let mut resolver = EligibilityResolver::new();
        match resolver.mount(&session_with(r#"{"_id":"c1","id":"other"}"#)) {
            MountOutcome::Fetch { candidate_id, .. } => assert_eq!(candidate_id, "c1"),
            other => panic!("expected fetch, got {:?}", other),
        }
        assert!(resolver.is_fetching());
    }

    #[test]
    fn eligible_record_enables_give_test() {
        let mut resolver = EligibilityResolver::new();
        let token = fetch_token(resolver.mount(&session_with(r#"{"_id":"c1"}"#)));

        let applied = resolver.complete(
            token,
            Ok(json!([{
                "title": "Algo Test",
                "isActive": true,
                "questionSetId": "q1",
                "skills": ["JS"]
            }])),
        );

        assert!(applied);
        let cards = resolver.resolution().unwrap().cards();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].title, "Algo Test");
        assert_eq!(cards[0].skills, vec!["JS".to_string()]);
        let route = cards[0].action().expect("button should be enabled");
        assert_eq!(
            route.path(),
            "/Candidate-Dashboard/Examination/TestDetails/q1"
        );
    }

    #[test]
    fn single_blank_record_is_not_shortlisted() {
        assert_eq!(classify(Ok(json!([{}]))), Resolution::NotShortlisted);
        assert_eq!(
            classify(Ok(json!([{"title": null, "company": ""}]))),
            Resolution::NotShortlisted
        );
    }

    #[test]
    fn blank_record_among_others_is_kept() {
        match classify(Ok(json!([{}, {"title": "Second"}]))) {
            Resolution::Eligible(cards) => {
                assert_eq!(cards.len(), 2);
                assert_eq!(cards[0].title, "Assessment");
                assert_eq!(cards[1].title, "Second");
            }
            other => panic!("expected eligible, got {:?}", other),
        }
    }

    #[test]
    fn empty_or_non_array_is_not_shortlisted() {
        assert_eq!(classify(Ok(json!([]))), Resolution::NotShortlisted);
        assert_eq!(classify(Ok(json!({"title": "x"}))), Resolution::NotShortlisted);
        assert_eq!(classify(Ok(Value::Null)), Resolution::NotShortlisted);
    }

    #[test]
    fn service_failure_is_fetch_error() {
        let resolution = classify(Err(ApiError::Status(500)));
        assert_eq!(resolution, Resolution::FetchError);
        assert_eq!(resolution.cards()[0].title, FETCH_ERROR_TITLE);
        assert_ne!(resolution.cards()[0].title, NOT_SHORTLISTED_TITLE);
    }

    #[test]
    fn inactive_record_disables_button() {
        match classify(Ok(json!([{"title": "Later", "isActive": false}]))) {
            Resolution::Eligible(cards) => assert!(cards[0].action().is_none()),
            other => panic!("expected eligible, got {:?}", other),
        }
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut resolver = EligibilityResolver::new();
        let session = session_with(r#"{"_id":"c1"}"#);

        let first = fetch_token(resolver.mount(&session));
        let second = fetch_token(resolver.mount(&session));
        assert_ne!(first, second);

        assert!(resolver.complete(second, Ok(json!([{"title": "Fresh"}]))));
        assert!(!resolver.complete(first, Err(ApiError::Transport("late".into()))));

        match resolver.resolution() {
            Some(Resolution::Eligible(cards)) => assert_eq!(cards[0].title, "Fresh"),
            other => panic!("expected fresh result, got {:?}", other),
        }
    }

    #[test]
    fn response_after_resolution_is_ignored() {
        let mut resolver = EligibilityResolver::new();
        let token = fetch_token(resolver.mount(&session_with(r#"{"id":"c1"}"#)));

        assert!(resolver.complete(token, Ok(json!([]))));
        assert!(!resolver.complete(token, Ok(json!([{"title": "Twice"}]))));
        assert_eq!(resolver.resolution(), Some(&Resolution::NotShortlisted));
    }

    #[test]
    fn remount_without_candidate_supersedes_fetch() {
        let mut resolver = EligibilityResolver::new();
        let token = fetch_token(resolver.mount(&session_with(r#"{"id":"c1"}"#)));

        resolver.mount(&SessionStore::new());

        assert!(!resolver.complete(token, Ok(json!([{"title": "Late"}]))));
        assert_eq!(resolver.resolution(), Some(&Resolution::NotShortlisted));
    }
}

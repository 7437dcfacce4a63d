// SPDX-License-Identifier: MPL-2.0
//! Test details screen: questions, answers, submission and violations.
//!
//! The screen is opened with a question-set id. It starts the test on the
//! test-taking service, shows the returned questions, and submits the
//! selected answers as one section. Focus and camera losses observed while
//! the screen is shown are kept as violations and sent before the section.

use crate::error::ApiError;
use crate::i18n::fluent::I18n;
use crate::ui::design_tokens::{spacing, typography};
use crate::ui::styles;
use chrono::{DateTime, Utc};
use iced::widget::{button, column, container, radio, row, scrollable, text, Column, Space};
use iced::{Element, Length};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone)]
pub enum Message {
    SelectAnswer { question_id: String, option: usize },
    Submit,
    Back,
}

/// One question of the started test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
}

/// Reads the questions of a `start_test` response.
///
/// Accepts either `{ "questions": [...] }` (optionally nested under `data`)
/// or a bare array. Entries without an id are numbered by position.
#[must_use]
pub fn parse_questions(response: &Value) -> Vec<Question> {
    let list = response
        .get("questions")
        .or_else(|| response.get("data").and_then(|data| data.get("questions")))
        .unwrap_or(response);

    let Some(items) = list.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let fields = item.as_object()?;
            let id = ["id", "_id"]
                .iter()
                .filter_map(|key| fields.get(*key))
                .find_map(|value| match value {
                    Value::String(s) if !s.is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| format!("q{}", index + 1));
            let prompt = ["question", "text"]
                .iter()
                .filter_map(|key| fields.get(*key).and_then(Value::as_str))
                .find(|s| !s.is_empty())
                .unwrap_or_default()
                .to_string();
            let options = fields
                .get("options")
                .and_then(Value::as_array)
                .map(|options| options.iter().map(option_label).collect())
                .unwrap_or_default();

            Some(Question {
                id,
                prompt,
                options,
            })
        })
        .collect()
}

fn option_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(fields) => ["text", "label", "value"]
            .iter()
            .filter_map(|key| fields.get(*key))
            .find_map(|v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Title of a `start_test` response, when it carries one.
fn parse_title(response: &Value) -> Option<String> {
    ["title", "name"]
        .iter()
        .filter_map(|key| response.get(*key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    FocusLost,
    CameraLost,
}

impl ViolationKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ViolationKind::FocusLost => "focus_lost",
            ViolationKind::CameraLost => "camera_lost",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    #[serde(rename = "timestamp")]
    pub at: DateTime<Utc>,
}

/// Violations not yet accepted by the service.
#[derive(Debug, Clone, Default)]
pub struct ViolationReport {
    pending: Vec<Violation>,
}

impl ViolationReport {
    pub fn record(&mut self, kind: ViolationKind, at: DateTime<Utc>) {
        self.pending.push(Violation { kind, at });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.pending.iter()
    }

    /// Body of a `save_violations` request for the first `count` entries.
    #[must_use]
    pub fn payload(&self, question_set_id: &str, candidate_id: &str, count: usize) -> Value {
        let violations: Vec<&Violation> = self.pending.iter().take(count).collect();
        json!({
            "questionSetId": question_set_id,
            "candidateId": candidate_id,
            "violations": violations,
        })
    }

    /// Forgets the first `count` entries once the service has stored them.
    pub fn acknowledge(&mut self, count: usize) {
        let count = count.min(self.pending.len());
        self.pending.drain(..count);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TestPhase {
    Loading,
    Ready,
    LoadFailed(ApiError),
    Submitting,
    Submitted,
    SubmitFailed(ApiError),
}

/// Identifies one submission attempt. Unique for the whole process, so a
/// test reopened under the same id never accepts an older result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionToken(u64);

impl SubmissionToken {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Requests to send when the candidate submits.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub token: SubmissionToken,
    pub question_set_id: String,
    pub body: Value,
    /// `save_violations` body and the number of violations it carries.
    pub violations: Option<(Value, usize)>,
}

#[derive(Debug, Clone)]
pub struct TestDetailsState {
    question_set_id: String,
    title: Option<String>,
    phase: TestPhase,
    questions: Vec<Question>,
    answers: BTreeMap<String, usize>,
    violations: ViolationReport,
    in_flight: Option<SubmissionToken>,
}

impl TestDetailsState {
    #[must_use]
    pub fn new(question_set_id: impl Into<String>) -> Self {
        Self {
            question_set_id: question_set_id.into(),
            title: None,
            phase: TestPhase::Loading,
            questions: Vec::new(),
            answers: BTreeMap::new(),
            violations: ViolationReport::default(),
            in_flight: None,
        }
    }

    #[must_use]
    pub fn question_set_id(&self) -> &str {
        &self.question_set_id
    }

    #[must_use]
    pub fn phase(&self) -> &TestPhase {
        &self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn violations(&self) -> &ViolationReport {
        &self.violations
    }

    /// Submission whose result is still awaited.
    #[must_use]
    pub fn submission_in_flight(&self) -> Option<SubmissionToken> {
        self.in_flight
    }

    #[must_use]
    pub fn answer(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn on_started(&mut self, result: Result<Value, ApiError>) {
        match result {
            Ok(response) => {
                self.title = parse_title(&response);
                self.questions = parse_questions(&response);
                self.phase = TestPhase::Ready;
            }
            Err(error) => self.phase = TestPhase::LoadFailed(error),
        }
    }

    /// Records an answer. Unknown questions and out-of-range options are
    /// ignored.
    pub fn select(&mut self, question_id: &str, option: usize) {
        let valid = self
            .questions
            .iter()
            .any(|q| q.id == question_id && option < q.options.len());
        if valid {
            self.answers.insert(question_id.to_string(), option);
        }
    }

    pub fn record_violation(&mut self, kind: ViolationKind, at: DateTime<Utc>) {
        self.violations.record(kind, at);
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        matches!(self.phase, TestPhase::Ready | TestPhase::SubmitFailed(_))
    }

    /// Body of the section submission.
    #[must_use]
    pub fn submission_body(&self, candidate_id: &str) -> Value {
        let answers: Vec<Value> = self
            .questions
            .iter()
            .filter_map(|question| {
                let index = *self.answers.get(&question.id)?;
                Some(json!({
                    "questionId": question.id,
                    "selectedOption": index,
                    "answer": question.options.get(index),
                }))
            })
            .collect();

        json!({
            "questionSetId": self.question_set_id,
            "candidateId": candidate_id,
            "answers": answers,
        })
    }

    /// Moves to `Submitting` and returns what to send, or `None` when a
    /// submission is not possible right now.
    pub fn begin_submit(&mut self, candidate_id: &str) -> Option<Submission> {
        if !self.can_submit() {
            return None;
        }
        self.phase = TestPhase::Submitting;
        let token = SubmissionToken::next();
        self.in_flight = Some(token);

        let count = self.violations.len();
        let violations = (count > 0).then(|| {
            (
                self.violations
                    .payload(&self.question_set_id, candidate_id, count),
                count,
            )
        });

        Some(Submission {
            token,
            question_set_id: self.question_set_id.clone(),
            body: self.submission_body(candidate_id),
            violations,
        })
    }

    /// Applies the outcome of the submission identified by `token`.
    /// `violations_saved` is the number of violations the service accepted.
    ///
    /// Returns `false`, leaving the state untouched, when `token` is not the
    /// submission currently in flight.
    pub fn on_submitted(
        &mut self,
        token: SubmissionToken,
        violations_saved: usize,
        result: Result<Value, ApiError>,
    ) -> bool {
        if self.in_flight != Some(token) {
            return false;
        }
        self.in_flight = None;
        self.violations.acknowledge(violations_saved);
        self.phase = match result {
            Ok(_) => TestPhase::Submitted,
            Err(error) => TestPhase::SubmitFailed(error),
        };
        true
    }

    pub fn view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        let title = self
            .title
            .clone()
            .unwrap_or_else(|| i18n.tr("test-details-title"));

        let header = row![
            button(text(i18n.tr("test-details-back")))
                .on_press(Message::Back)
                .style(styles::button::secondary),
            text(title).size(typography::TITLE_MD),
        ]
        .spacing(spacing::MD)
        .align_y(iced::Alignment::Center);

        let body: Element<'a, Message> = match &self.phase {
            TestPhase::Loading => text(i18n.tr("test-details-loading")).into(),
            TestPhase::LoadFailed(error) => text(i18n.tr_with_args(
                "test-details-load-failed",
                &[("reason", &error.to_string())],
            ))
            .into(),
            TestPhase::Submitted => text(i18n.tr("test-details-submitted"))
                .size(typography::BODY_LG)
                .into(),
            TestPhase::Ready | TestPhase::Submitting | TestPhase::SubmitFailed(_) => {
                self.questions_view(i18n)
            }
        };

        let mut content = column![header].spacing(spacing::LG).padding(spacing::LG);

        if !self.violations.is_empty() {
            let count = self.violations.len().to_string();
            content = content.push(
                text(i18n.tr_with_args("test-details-violations", &[("count", &count)]))
                    .size(typography::CAPTION)
                    .style(text::danger),
            );
        }

        content = content.push(body);

        if let TestPhase::SubmitFailed(error) = &self.phase {
            content = content.push(
                text(i18n.tr(error.i18n_key()))
                    .size(typography::BODY_SM)
                    .style(text::danger),
            );
        }

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn questions_view<'a>(&'a self, i18n: &'a I18n) -> Element<'a, Message> {
        if self.questions.is_empty() {
            return text(i18n.tr("test-details-no-questions")).into();
        }

        let questions = self.questions.iter().enumerate().fold(
            Column::new().spacing(spacing::LG),
            |list, (index, question)| {
                let number = (index + 1).to_string();
                let options = question.options.iter().enumerate().fold(
                    Column::new().spacing(spacing::XS),
                    |options, (option_index, label)| {
                        let question_id = question.id.clone();
                        options.push(radio(
                            label.as_str(),
                            option_index,
                            self.answer(&question.id),
                            move |option| Message::SelectAnswer {
                                question_id: question_id.clone(),
                                option,
                            },
                        ))
                    },
                );

                list.push(
                    column![
                        text(i18n.tr_with_args(
                            "test-details-question",
                            &[("number", &number), ("prompt", &question.prompt)],
                        ))
                        .size(typography::BODY_LG),
                        options,
                    ]
                    .spacing(spacing::SM),
                )
            },
        );

        let submitting = self.phase == TestPhase::Submitting;
        let label = if submitting {
            i18n.tr("test-details-submitting")
        } else {
            i18n.tr("test-details-submit")
        };
        let submit = button(text(label))
            .on_press_maybe(self.can_submit().then_some(Message::Submit))
            .style(styles::button::primary);

        column![questions, Space::new().height(spacing::MD), submit]
            .spacing(spacing::SM)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn started() -> TestDetailsState {
        let mut state = TestDetailsState::new("qs-1");
        state.on_started(Ok(json!({
            "title": "Rust basics",
            "questions": [
                {"_id": "a", "question": "Ownership?", "options": ["move", "copy"]},
                {"id": 7, "text": "Borrow?", "options": [{"text": "&"}, {"text": "&mut"}]},
                {"options": ["x"]}
            ]
        })));
        state
    }

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).single().unwrap()
    }

    #[test]
    fn parses_questions_leniently() {
        let state = started();
        let questions = state.questions();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].id, "a");
        assert_eq!(questions[1].id, "7");
        assert_eq!(questions[1].prompt, "Borrow?");
        assert_eq!(questions[1].options, vec!["&", "&mut"]);
        assert_eq!(questions[2].id, "q3");
        assert_eq!(state.phase(), &TestPhase::Ready);
    }

    #[test]
    fn bare_array_and_nested_data_are_accepted() {
        assert_eq!(parse_questions(&json!([{"id": "x"}])).len(), 1);
        assert_eq!(
            parse_questions(&json!({"data": {"questions": [{"id": "y"}]}})).len(),
            1
        );
        assert!(parse_questions(&json!("nope")).is_empty());
    }

    #[test]
    fn selection_ignores_unknown_question_and_out_of_range_option() {
        let mut state = started();
        state.select("a", 1);
        state.select("a", 9);
        state.select("zzz", 0);
        assert_eq!(state.answer("a"), Some(1));
        assert_eq!(state.answer("zzz"), None);
    }

    #[test]
    fn submission_body_lists_answered_questions() {
        let mut state = started();
        state.select("7", 0);
        let body = state.submission_body("cand-1");

        assert_eq!(body["questionSetId"], "qs-1");
        assert_eq!(body["candidateId"], "cand-1");
        let answers = body["answers"].as_array().unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0]["questionId"], "7");
        assert_eq!(answers[0]["answer"], "&");
    }

    #[test]
    fn load_failure_blocks_submission() {
        let mut state = TestDetailsState::new("qs-1");
        state.on_started(Err(ApiError::Status(500)));
        assert!(state.begin_submit("c").is_none());
    }

    #[test]
    fn violations_ride_along_with_submission() {
        let mut state = started();
        state.record_violation(ViolationKind::FocusLost, at(10));
        state.record_violation(ViolationKind::CameraLost, at(20));

        let submission = state.begin_submit("cand-1").unwrap();
        let (payload, count) = submission.violations.unwrap();
        assert_eq!(count, 2);
        assert_eq!(payload["violations"][0]["type"], "focus_lost");
        assert_eq!(payload["violations"][1]["type"], "camera_lost");
        assert_eq!(state.phase(), &TestPhase::Submitting);
        assert!(state.begin_submit("cand-1").is_none());
    }

    #[test]
    fn only_acknowledged_violations_are_forgotten() {
        let mut state = started();
        state.record_violation(ViolationKind::FocusLost, at(10));
        let submission = state.begin_submit("c").unwrap();
        let (_, count) = submission.violations.unwrap();

        // Recorded while the request was in flight.
        state.record_violation(ViolationKind::FocusLost, at(11));
        assert!(state.on_submitted(submission.token, count, Ok(json!({}))));

        assert_eq!(state.violations().len(), 1);
        assert_eq!(state.phase(), &TestPhase::Submitted);
    }

    #[test]
    fn failed_submission_can_be_retried() {
        let mut state = started();
        let token = state.begin_submit("c").unwrap().token;
        state.on_submitted(token, 0, Err(ApiError::Transport("down".into())));
        assert!(state.can_submit());
        assert!(state.begin_submit("c").is_some());
    }

    #[test]
    fn result_of_another_submission_is_ignored() {
        let mut first = started();
        let old = first.begin_submit("c").unwrap().token;

        // Same question set opened again while the old request is in flight.
        let mut second = started();
        second.record_violation(ViolationKind::FocusLost, at(5));
        let current = second.begin_submit("c").unwrap().token;
        assert_ne!(old, current);

        assert!(!second.on_submitted(old, 1, Ok(json!({}))));
        assert_eq!(second.phase(), &TestPhase::Submitting);
        assert_eq!(second.violations().len(), 1);

        assert!(second.on_submitted(current, 1, Ok(json!({}))));
        assert_eq!(second.phase(), &TestPhase::Submitted);
        assert!(!second.on_submitted(current, 0, Ok(json!({}))));
    }

    #[test]
    fn no_violations_means_no_violation_request() {
        let mut state = started();
        let submission = state.begin_submit("c").unwrap();
        assert!(submission.violations.is_none());
    }
}

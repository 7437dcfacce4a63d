// SPDX-License-Identifier: MPL-2.0
//! Assessment records and the display cards built from them.
//!
//! The assessment service is loosely typed, so records are read field by
//! field from a [`serde_json::Value`] and every missing or ill-typed field
//! falls back to a default instead of failing the whole list.

use super::resolver::Route;
use serde_json::{Map, Value};

pub const NOT_SHORTLISTED_TITLE: &str = "No Examination Available";
pub const NOT_SHORTLISTED_DESCRIPTION: &str = "You have not been shortlisted for the test.";
pub const FETCH_ERROR_TITLE: &str = "No Assessment Found";
pub const FETCH_ERROR_DESCRIPTION: &str =
    "No assessment has been generated yet. Please check back later.";

/// Shown for dates, times and locations that have no value.
pub const EM_DASH: &str = "—";

const DEFAULT_TITLE: &str = "Assessment";
const DEFAULT_DESCRIPTION: &str = "This is an assessment for your role.";
const DEFAULT_START_DATE: &str = "Today";
const DEFAULT_START_TIME: &str = "10:00 AM";
const DEFAULT_QUESTION_SET_ID: &str = "assessment";

/// One finalized assessment as returned by the service, with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRecord {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub skills: Vec<String>,
    pub description: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub is_active: bool,
    pub question_set_id: String,
    pub questions: Vec<Value>,
    pub ai_score: Option<Value>,
    pub ai_explanation: Option<Value>,
}

impl AssessmentRecord {
    /// Reads a record leniently. Non-object values yield an all-default record.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);

        Self {
            title: text(fields, "title").unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            company: text(fields, "company"),
            location: text(fields, "location"),
            work_type: text(fields, "workType"),
            skills: fields
                .get("skills")
                .and_then(Value::as_array)
                .map(|skills| skills.iter().filter_map(scalar_text).collect())
                .unwrap_or_default(),
            description: text(fields, "description")
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            start_date: text(fields, "startDate")
                .unwrap_or_else(|| DEFAULT_START_DATE.to_string()),
            start_time: text(fields, "startTime")
                .unwrap_or_else(|| DEFAULT_START_TIME.to_string()),
            end_date: text(fields, "endDate").unwrap_or_else(|| EM_DASH.to_string()),
            end_time: text(fields, "endTime").unwrap_or_else(|| EM_DASH.to_string()),
            // Only an explicit boolean `false` deactivates a record.
            is_active: fields
                .get("isActive")
                .and_then(Value::as_bool)
                .unwrap_or(true),
            question_set_id: text(fields, "questionSetId")
                .or_else(|| text(fields, "question_set_id"))
                .unwrap_or_else(|| DEFAULT_QUESTION_SET_ID.to_string()),
            questions: fields
                .get("questions")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            ai_score: present(fields, "aiScore"),
            ai_explanation: present(fields, "aiExplanation"),
        }
    }
}

/// Non-empty text for `key`; numbers are accepted and stringified.
fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(scalar_text)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn present(fields: &Map<String, Value>, key: &str) -> Option<Value> {
    fields.get(key).filter(|value| !value.is_null()).cloned()
}

/// Whether a lone record carries no data at all.
///
/// Every field must be `null` or an empty string; `{}` qualifies, as does
/// any element that is not an object.
#[must_use]
pub fn is_blank_record(value: &Value) -> bool {
    match value {
        Value::Object(fields) => fields.values().all(|v| match v {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }),
        _ => true,
    }
}

/// A card in the examination list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamCard {
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub skills: Vec<String>,
    pub description: String,
    pub start_date: String,
    pub start_time: String,
    pub end_date: String,
    pub end_time: String,
    pub is_active: bool,
    pub question_set_id: Option<String>,
    pub ai_score: Option<String>,
    pub ai_explanation: Option<String>,
}

impl ExamCard {
    fn placeholder(title: &str, description: &str, work_type: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            company: None,
            location: Some(EM_DASH.to_string()),
            work_type: work_type.map(str::to_string),
            skills: Vec::new(),
            description: description.to_string(),
            start_date: EM_DASH.to_string(),
            start_time: EM_DASH.to_string(),
            end_date: EM_DASH.to_string(),
            end_time: EM_DASH.to_string(),
            is_active: false,
            question_set_id: None,
            ai_score: None,
            ai_explanation: None,
        }
    }

    /// The card shown when the candidate has no examination.
    #[must_use]
    pub fn not_shortlisted() -> Self {
        Self::placeholder(NOT_SHORTLISTED_TITLE, NOT_SHORTLISTED_DESCRIPTION, None)
    }

    /// The card shown when the assessments could not be fetched.
    #[must_use]
    pub fn fetch_error() -> Self {
        Self::placeholder(FETCH_ERROR_TITLE, FETCH_ERROR_DESCRIPTION, Some(EM_DASH))
    }

    /// Where "Give Test" leads, or `None` when the button is disabled.
    #[must_use]
    pub fn action(&self) -> Option<Route> {
        if !self.is_active {
            return None;
        }
        self.question_set_id
            .clone()
            .map(|question_set_id| Route::TestDetails { question_set_id })
    }

    /// "{date} at {time}" for the start of the window.
    #[must_use]
    pub fn starts(&self) -> String {
        format!("{} at {}", self.start_date, self.start_time)
    }

    /// "{date} at {time}" for the end of the window.
    #[must_use]
    pub fn ends(&self) -> String {
        format!("{} at {}", self.end_date, self.end_time)
    }
}

impl From<AssessmentRecord> for ExamCard {
    fn from(record: AssessmentRecord) -> Self {
        Self {
            title: record.title,
            company: record.company,
            location: record.location,
            work_type: record.work_type,
            skills: record.skills,
            description: record.description,
            start_date: record.start_date,
            start_time: record.start_time,
            end_date: record.end_date,
            end_time: record.end_time,
            is_active: record.is_active,
            question_set_id: Some(record.question_set_id),
            ai_score: record.ai_score.map(display_value),
            ai_explanation: record.ai_explanation.map(display_value),
        }
    }
}

fn display_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_gets_every_default() {
        let record = AssessmentRecord::from_value(&json!({}));
        assert_eq!(record.title, "Assessment");
        assert_eq!(record.description, "This is an assessment for your role.");
        assert_eq!(record.start_date, "Today");
        assert_eq!(record.start_time, "10:00 AM");
        assert_eq!(record.end_date, EM_DASH);
        assert_eq!(record.end_time, EM_DASH);
        assert!(record.is_active);
        assert_eq!(record.question_set_id, "assessment");
        assert!(record.skills.is_empty());
        assert!(record.questions.is_empty());
        assert!(record.ai_score.is_none());
        assert!(record.ai_explanation.is_none());
    }

    #[test]
    fn only_explicit_false_deactivates() {
        let inactive = AssessmentRecord::from_value(&json!({"isActive": false}));
        let truthy_string = AssessmentRecord::from_value(&json!({"isActive": "false"}));
        let null = AssessmentRecord::from_value(&json!({"isActive": null}));
        assert!(!inactive.is_active);
        assert!(truthy_string.is_active);
        assert!(null.is_active);
    }

    #[test]
    fn question_set_id_falls_back_to_snake_case() {
        let record = AssessmentRecord::from_value(&json!({"question_set_id": "qs-9"}));
        assert_eq!(record.question_set_id, "qs-9");

        let both = AssessmentRecord::from_value(
            &json!({"questionSetId": "camel", "question_set_id": "snake"}),
        );
        assert_eq!(both.question_set_id, "camel");
    }

    #[test]
    fn non_array_skills_and_questions_become_empty() {
        let record = AssessmentRecord::from_value(&json!({
            "skills": "JS, Rust",
            "questions": {"q1": "?"}
        }));
        assert!(record.skills.is_empty());
        assert!(record.questions.is_empty());
    }

    #[test]
    fn empty_strings_use_defaults() {
        let record = AssessmentRecord::from_value(&json!({"title": "", "startTime": ""}));
        assert_eq!(record.title, "Assessment");
        assert_eq!(record.start_time, "10:00 AM");
    }

    #[test]
    fn ai_fields_are_kept_when_present() {
        let card = ExamCard::from(AssessmentRecord::from_value(&json!({
            "aiScore": 87,
            "aiExplanation": "Strong match"
        })));
        assert_eq!(card.ai_score.as_deref(), Some("87"));
        assert_eq!(card.ai_explanation.as_deref(), Some("Strong match"));
    }

    #[test]
    fn blank_record_detection() {
        assert!(is_blank_record(&json!({})));
        assert!(is_blank_record(&json!({"title": null, "company": ""})));
        assert!(!is_blank_record(&json!({"title": "Algo Test"})));
        assert!(!is_blank_record(&json!({"isActive": false})));
        assert!(is_blank_record(&json!(null)));
    }

    #[test]
    fn placeholders_are_disabled() {
        assert!(ExamCard::not_shortlisted().action().is_none());
        assert!(ExamCard::fetch_error().action().is_none());
        assert_ne!(
            ExamCard::not_shortlisted().title,
            ExamCard::fetch_error().title
        );
    }

    #[test]
    fn active_card_routes_to_its_question_set() {
        let card = ExamCard::from(AssessmentRecord::from_value(&json!({
            "title": "Algo Test",
            "questionSetId": "q1"
        })));
        assert_eq!(
            card.action(),
            Some(Route::TestDetails {
                question_set_id: "q1".to_string()
            })
        );
    }

    #[test]
    fn start_and_end_labels() {
        let card = ExamCard::not_shortlisted();
        assert_eq!(card.starts(), "— at —");
        assert_eq!(card.ends(), "— at —");
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Session-scoped key-value cache holding the signed-in candidate.
//!
//! The store mirrors a browser session cache: string keys mapped to string
//! values, alive for the lifetime of the process. The candidate record is a
//! JSON document stored under [`CANDIDATE_KEY`].

use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Key holding the candidate record.
pub const CANDIDATE_KEY: &str = "candidateData";

/// Environment variable that can carry the candidate record at startup.
pub const ENV_CANDIDATE: &str = "PROCTOR_LENS_CANDIDATE";

/// Identity of the candidate using the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateIdentity {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// In-memory session cache.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    entries: HashMap<String, String>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store seeded from `--candidate`, falling back to the
    /// environment variable.
    #[must_use]
    pub fn from_startup(cli_candidate: Option<String>) -> Self {
        let mut store = Self::new();
        let raw = cli_candidate.or_else(|| {
            std::env::var(ENV_CANDIDATE)
                .ok()
                .filter(|value| !value.is_empty())
        });
        if let Some(raw) = raw {
            store.set(CANDIDATE_KEY, raw);
        }
        store
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Reads the candidate record.
    ///
    /// `Ok(None)` when the key is absent, holds JSON `null`, or the record
    /// carries neither `_id` nor `id`. A value that is not JSON is an error.
    pub fn candidate(&self) -> Result<Option<CandidateIdentity>> {
        let Some(raw) = self.get(CANDIDATE_KEY) else {
            return Ok(None);
        };
        let value: Value = serde_json::from_str(raw)?;
        match value {
            Value::Null => Ok(None),
            Value::Object(ref record) => {
                let id = ["_id", "id"]
                    .iter()
                    .filter_map(|key| record.get(*key))
                    .find_map(identifier_text);
                Ok(id.map(|id| CandidateIdentity {
                    id,
                    name: text_field(&value, "name"),
                    email: text_field(&value, "email"),
                }))
            }
            other => Err(Error::Session(format!(
                "candidate record is not an object: {}",
                other
            ))),
        }
    }
}

fn identifier_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn text_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(raw: &str) -> SessionStore {
        let mut store = SessionStore::new();
        store.set(CANDIDATE_KEY, raw);
        store
    }

    #[test]
    fn absent_key_means_no_candidate() {
        assert_eq!(SessionStore::new().candidate().unwrap(), None);
    }

    #[test]
    fn json_null_means_no_candidate() {
        assert_eq!(store_with("null").candidate().unwrap(), None);
    }

    #[test]
    fn underscore_id_is_preferred() {
        let candidate = store_with(r#"{"_id":"abc","id":"xyz","name":"Ada"}"#)
            .candidate()
            .unwrap()
            .unwrap();
        assert_eq!(candidate.id, "abc");
        assert_eq!(candidate.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn plain_id_is_used_when_underscore_id_missing() {
        let candidate = store_with(r#"{"id":"xyz"}"#).candidate().unwrap().unwrap();
        assert_eq!(candidate.id, "xyz");
    }

    #[test]
    fn numeric_id_is_stringified() {
        let candidate = store_with(r#"{"id":42}"#).candidate().unwrap().unwrap();
        assert_eq!(candidate.id, "42");
    }

    #[test]
    fn record_without_id_is_absent() {
        assert_eq!(store_with(r#"{"name":"Ada"}"#).candidate().unwrap(), None);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            store_with("{not json").candidate(),
            Err(Error::Session(_))
        ));
    }

    #[test]
    fn non_object_record_is_an_error() {
        assert!(store_with("[1,2]").candidate().is_err());
    }

    #[test]
    fn cli_candidate_seeds_the_store() {
        let store = SessionStore::from_startup(Some(r#"{"_id":"c1"}"#.to_string()));
        assert_eq!(store.get(CANDIDATE_KEY), Some(r#"{"_id":"c1"}"#));
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Test-taking service client.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation          | Request                                  |
//! |--------------------|------------------------------------------|
//! | [`TestApi::start_test`]      | `GET  /test/start/{questionSetId}`        |
//! | [`TestApi::submit_section`]  | `POST /test/submit_section/{questionSetId}` |
//! | [`TestApi::save_violations`] | `POST /test/save_violations`              |

use super::{build_client, endpoint, parse_base_url, read_json};
use crate::config::DEFAULT_API_BASE_URL;
use crate::diagnostics::DiagnosticsHandle;
use crate::error::ApiError;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TestApi {
    client: reqwest::Client,
    base: Url,
    diagnostics: DiagnosticsHandle,
}

impl TestApi {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        diagnostics: DiagnosticsHandle,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            client: build_client(timeout)?,
            base: parse_base_url(base_url)?,
            diagnostics,
        })
    }

    /// Client pointed at the default local service.
    pub fn with_default_base(diagnostics: DiagnosticsHandle) -> Result<Self, ApiError> {
        Self::new(DEFAULT_API_BASE_URL, Duration::from_secs(15), diagnostics)
    }

    pub fn start_test_url(&self, question_set_id: &str) -> Result<Url, ApiError> {
        endpoint(&self.base, &["test", "start", question_set_id])
    }

    /// An empty id posts to the bare `/test/submit_section` path.
    pub fn submit_section_url(&self, question_set_id: &str) -> Result<Url, ApiError> {
        endpoint(&self.base, &["test", "submit_section", question_set_id])
    }

    pub fn save_violations_url(&self) -> Result<Url, ApiError> {
        endpoint(&self.base, &["test", "save_violations"])
    }

    /// Starts (or resumes) the test for a question set.
    pub async fn start_test(&self, question_set_id: &str) -> Result<Value, ApiError> {
        let result = async {
            let response = self
                .client
                .get(self.start_test_url(question_set_id)?)
                .send()
                .await
                .map_err(|e| ApiError::from_reqwest(&e))?;
            read_json(response).await
        }
        .await;
        self.report("start test", result)
    }

    /// Submits the answers of one section.
    pub async fn submit_section(
        &self,
        question_set_id: &str,
        section: &Value,
    ) -> Result<Value, ApiError> {
        let result = self
            .post_json(self.submit_section_url(question_set_id), section)
            .await;
        self.report("submit section", result)
    }

    /// Uploads the proctoring violations collected so far.
    pub async fn save_violations(&self, payload: &Value) -> Result<Value, ApiError> {
        let result = self.post_json(self.save_violations_url(), payload).await;
        self.report("save violations", result)
    }

    async fn post_json(&self, url: Result<Url, ApiError>, body: &Value) -> Result<Value, ApiError> {
        let response = self
            .client
            .post(url?)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(&e))?;
        read_json(response).await
    }

    fn report(&self, operation: &str, result: Result<Value, ApiError>) -> Result<Value, ApiError> {
        if let Err(err) = &result {
            self.diagnostics
                .log_error(format!("Failed to {}: {}", operation, err));
        }
        result
    }
}

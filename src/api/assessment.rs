// SPDX-License-Identifier: MPL-2.0
//! Assessment service client.

use super::{build_client, endpoint, parse_base_url, read_json};
use crate::diagnostics::DiagnosticsHandle;
use crate::error::ApiError;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Source of finalized assessments for a candidate.
///
/// The eligibility flow only depends on this trait, so tests and alternative
/// back ends can be injected in place of [`AssessmentApi`].
pub trait AssessmentService: Send + Sync {
    /// Fetches the finalized assessments generated for `candidate_id`.
    ///
    /// The payload is expected to be a JSON array of assessment records.
    fn get_finalized_test(&self, candidate_id: &str) -> BoxFuture<'static, Result<Value, ApiError>>;
}

/// HTTP implementation of [`AssessmentService`].
#[derive(Debug, Clone)]
pub struct AssessmentApi {
    client: reqwest::Client,
    base: Url,
    diagnostics: DiagnosticsHandle,
}

impl AssessmentApi {
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

    /// `GET {base}/assessment/finalized/{candidate_id}`
    pub fn finalized_url(&self, candidate_id: &str) -> Result<Url, ApiError> {
        endpoint(&self.base, &["assessment", "finalized", candidate_id])
    }
}

impl AssessmentService for AssessmentApi {
    fn get_finalized_test(&self, candidate_id: &str) -> BoxFuture<'static, Result<Value, ApiError>> {
        let client = self.client.clone();
        let diagnostics = self.diagnostics.clone();
        let url = self.finalized_url(candidate_id);

        async move {
            let result = async {
                let response = client
                    .get(url?)
                    .send()
                    .await
                    .map_err(|e| ApiError::from_reqwest(&e))?;
                read_json(response).await
            }
            .await;

            if let Err(err) = &result {
                diagnostics.log_error(format!("Failed to fetch finalized assessments: {}", err));
            }
            result
        }
        .boxed()
    }
}

/// Stand-in used when the configured base URL is unusable: every request
/// fails with the construction error.
#[derive(Debug, Clone)]
pub struct UnavailableAssessments {
    error: ApiError,
}

impl UnavailableAssessments {
    #[must_use]
    pub fn new(error: ApiError) -> Self {
        Self { error }
    }
}

impl AssessmentService for UnavailableAssessments {
    fn get_finalized_test(&self, _candidate_id: &str) -> BoxFuture<'static, Result<Value, ApiError>> {
        futures_util::future::ready(Err(self.error.clone())).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalized_url_includes_candidate_id() {
        let api = AssessmentApi::new(
            "http://127.0.0.1:5000/api/v1",
            Duration::from_secs(5),
            DiagnosticsHandle::disconnected(),
        )
        .unwrap();

        assert_eq!(
            api.finalized_url("cand 7").unwrap().as_str(),
            "http://127.0.0.1:5000/api/v1/assessment/finalized/cand%207"
        );
    }

    #[test]
    fn invalid_base_url_fails_construction() {
        let result = AssessmentApi::new(
            "::nope::",
            Duration::from_secs(5),
            DiagnosticsHandle::disconnected(),
        );
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn unavailable_service_returns_its_error() {
        let service = UnavailableAssessments::new(ApiError::InvalidUrl("::nope::".into()));
        let result = service.get_finalized_test("c1").await;
        assert_eq!(result, Err(ApiError::InvalidUrl("::nope::".into())));
    }
}

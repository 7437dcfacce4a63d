// SPDX-License-Identifier: MPL-2.0
//! Thin HTTP clients for the assessment and test-taking services.
//!
//! Both clients share a base URL (see [`crate::config::ApiConfig`]) and
//! report every failure to diagnostics before handing it back to the caller.
//! Responses are kept as raw [`serde_json::Value`]s; the exam module decides
//! how leniently to read them.

pub mod assessment;
pub mod test_api;

pub use assessment::{AssessmentApi, AssessmentService, UnavailableAssessments};
pub use test_api::TestApi;

use crate::error::ApiError;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;
use serde_json::Value;
use std::time::Duration;

/// Parses the configured base URL.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let url =
        Url::parse(base_url.trim()).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(base_url.to_string()));
    }
    Ok(url)
}

/// Characters left as-is in a path segment; everything else is
/// percent-encoded, including `+ & = : ; , @ $` and `/`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Appends path segments to `base`, percent-encoding each one.
///
/// Empty segments are skipped so a missing identifier never produces `//`.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    if base.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(base.to_string()));
    }

    let mut path = base.path().trim_end_matches('/').to_string();
    for segment in segments.iter().filter(|segment| !segment.is_empty()) {
        path.push('/');
        path.extend(utf8_percent_encode(segment, SEGMENT));
    }

    let mut url = base.clone();
    url.set_path(&path);
    Ok(url)
}

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ProctorLens/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ApiError::Transport(e.to_string()))
}

/// Turns a response into JSON, mapping non-2xx statuses to errors.
///
/// An empty success body reads as `null`.
pub(crate) async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }
    let body = response
        .bytes()
        .await
        .map_err(|e| ApiError::from_reqwest(&e))?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        parse_base_url("http://127.0.0.1:5000/api/v1").unwrap()
    }

    #[test]
    fn endpoint_appends_segments() {
        let url = endpoint(&base(), &["test", "start", "qs-1"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/api/v1/test/start/qs-1");
    }

    #[test]
    fn endpoint_handles_trailing_slash_base() {
        let base = parse_base_url("http://localhost/api/v1/").unwrap();
        let url = endpoint(&base, &["test", "save_violations"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost/api/v1/test/save_violations");
    }

    #[test]
    fn endpoint_percent_encodes_segments() {
        let url = endpoint(&base(), &["test", "submit_section", "a/b c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/api/v1/test/submit_section/a%2Fb%20c"
        );
    }

    #[test]
    fn endpoint_encodes_reserved_characters() {
        let id = "a+b&c=d:e;f,g@h$i";
        let url = endpoint(&base(), &["test", "submit_section", id]).unwrap();
        assert_eq!(
            url.path(),
            "/api/v1/test/submit_section/a%2Bb%26c%3Dd%3Ae%3Bf%2Cg%40h%24i"
        );
    }

    #[test]
    fn endpoint_keeps_unreserved_marks() {
        let url = endpoint(&base(), &["test", "start", "set-1_(v2)!~*'."]).unwrap();
        assert_eq!(url.path(), "/api/v1/test/start/set-1_(v2)!~*'.");
    }

    #[test]
    fn endpoint_skips_empty_segments() {
        let url = endpoint(&base(), &["test", "submit_section", ""]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/api/v1/test/submit_section"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_base_url("mailto:someone@example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}

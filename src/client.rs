//! HTTP client for the text analysis backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::Config,
    error::AnalysisError,
    models::{
        AnalysisResponse, AnalyzeRequest, ApiFailure, ComparisonRequest, ComparisonResponse,
        Endpoint, GeminiRequest, HealthStatus,
    },
};

/// JSON pointers checked for an `error` field in a comparison body: the
/// envelope and each analyzer's nested result.
const COMPARISON_ERROR_PATHS: &[&str] = &["", "/nltk", "/gemini"];
/// JSON pointers checked for an `error` field in a single-analysis body.
const SINGLE_ERROR_PATHS: &[&str] = &[""];

/// The analysis operations the dispatcher relies on.
///
/// [`AnalysisClient`] is the HTTP implementation; tests substitute their own.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Runs both analyzers on the text and returns them side by side.
    async fn compare(
        &self,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResponse, AnalysisError>;

    /// Runs the Gemini analyzer alone.
    async fn analyze_gemini(
        &self,
        request: &GeminiRequest,
    ) -> Result<AnalysisResponse, AnalysisError>;

    /// Runs the NLTK analyzer alone.
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, AnalysisError>;
}

/// A client for the text analysis API.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    base_url: String,
    client: reqwest::Client,
}

impl AnalysisClient {
    /// Creates a client for the backend at `base_url`, with no request timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Creates a client from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, AnalysisError> {
        match config.timeout_secs {
            Some(secs) => Self::with_timeout(&config.base_url, Duration::from_secs(secs)),
            None => Ok(Self::new(&config.base_url)),
        }
    }

    /// The backend base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Posts `body` as JSON and decodes the reply.
    async fn post<B, T>(
        &self,
        endpoint: Endpoint,
        body: &B,
        error_paths: &[&str],
    ) -> Result<T, AnalysisError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.build_url(endpoint);
        debug!(%url, "sending analysis request");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(%url, %status, bytes = text.len(), "received analysis response");

        decode_response(status, &text, error_paths)
    }

    /// Checks that the backend is up.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    pub async fn health(&self) -> Result<HealthStatus, AnalysisError> {
        let url = self.build_url(Endpoint::Health);
        debug!(%url, "checking backend health");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;
        decode_response(status, &text, SINGLE_ERROR_PATHS)
    }
}

#[async_trait]
impl AnalysisBackend for AnalysisClient {
    async fn compare(
        &self,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResponse, AnalysisError> {
        self.post(Endpoint::Compare, request, COMPARISON_ERROR_PATHS)
            .await
    }

    async fn analyze_gemini(
        &self,
        request: &GeminiRequest,
    ) -> Result<AnalysisResponse, AnalysisError> {
        self.post(Endpoint::AnalyzeGemini, request, SINGLE_ERROR_PATHS)
            .await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, AnalysisError> {
        self.post(Endpoint::Analyze, request, SINGLE_ERROR_PATHS)
            .await
    }
}

/// Decodes a backend reply.
///
/// The backend reports failures as `{"error": ...}` bodies, usually with
/// status 400, so the body is inspected before the status. An `error` field
/// at any of `error_paths` (JSON pointers) becomes [`AnalysisError::Api`].
///
/// # Errors
///
/// Returns [`AnalysisError::JsonError`] for malformed bodies,
/// [`AnalysisError::Api`] for failure bodies and [`AnalysisError::Status`] for
/// non-success statuses without an `error` field.
pub fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
    error_paths: &[&str],
) -> Result<T, AnalysisError> {
    let value: Value = serde_json::from_str(body)?;

    for path in error_paths {
        if let Some(failure) = value.pointer(path).and_then(failure_at) {
            return Err(AnalysisError::Api {
                message: failure.message(),
                details: failure.details(),
            });
        }
    }

    if !status.is_success() {
        return Err(AnalysisError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    Ok(serde_json::from_value(value)?)
}

/// Decodes a comparison reply, including failures nested under either analyzer.
///
/// # Errors
///
/// See [`decode_response`].
pub fn decode_comparison(
    status: StatusCode,
    body: &str,
) -> Result<ComparisonResponse, AnalysisError> {
    decode_response(status, body, COMPARISON_ERROR_PATHS)
}

/// Decodes a single-analyzer reply.
///
/// # Errors
///
/// See [`decode_response`].
pub fn decode_analysis(status: StatusCode, body: &str) -> Result<AnalysisResponse, AnalysisError> {
    decode_response(status, body, SINGLE_ERROR_PATHS)
}

// Empty, null and false error fields do not count as failures.
fn failure_at(value: &Value) -> Option<ApiFailure> {
    let error = value.get("error")?;
    let set = match error {
        Value::Null | Value::Bool(false) => false,
        Value::String(message) => !message.is_empty(),
        _ => true,
    };
    if !set {
        return None;
    }
    Some(ApiFailure {
        error: error.clone(),
        details: value.get("details").cloned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NLTK: &str = r##"{
        "statistics": {"total_words": 10, "total_sentences": 2, "avg_sentence_length": 5.0},
        "gulpease": 72.0, "ttr": 0.9,
        "complexity_score": {"score": 28.0, "category": "Molto Semplice", "color": "#22c55e"}
    }"##;

    #[test]
    fn error_field_wins_over_status() {
        let result = decode_analysis(StatusCode::BAD_REQUEST, r#"{"error": "Testo vuoto"}"#);
        match result {
            Err(AnalysisError::Api { message, details }) => {
                assert_eq!(message, "Testo vuoto");
                assert_eq!(details, None);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn error_details_are_kept() {
        let body = r#"{"error": "Errore parsing JSON da Gemini", "details": "Posizione errore: carattere 12"}"#;
        match decode_analysis(StatusCode::BAD_REQUEST, body) {
            Err(AnalysisError::Api { details, .. }) => {
                assert_eq!(details.as_deref(), Some("Posizione errore: carattere 12"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn structured_details_keep_the_message() {
        let body = r#"{"error": "Errore nell'analisi Gemini", "details": {"pos": 12}}"#;
        match decode_analysis(StatusCode::BAD_REQUEST, body) {
            Err(AnalysisError::Api { message, details }) => {
                assert_eq!(message, "Errore nell'analisi Gemini");
                assert_eq!(details.as_deref(), Some(r#"{"pos":12}"#));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let body = r#"{"error": "Errore nell'analisi Gemini", "details": ["a", "b"]}"#;
        assert!(matches!(
            decode_analysis(StatusCode::OK, body),
            Err(AnalysisError::Api { .. })
        ));
    }

    #[test]
    fn null_lists_are_not_a_decode_error() {
        let body = NLTK.replacen('{', r#"{"suggestions": null, "critical_points": null, "#, 1);
        let response = decode_analysis(StatusCode::OK, &body).unwrap();
        assert!(response.suggestions.is_empty());
        assert!(response.critical_points.is_empty());
    }

    #[test]
    fn nested_analyzer_error_is_a_failure() {
        let body = format!(
            r#"{{"nltk": {NLTK}, "gemini": {{"error": "API Key Gemini non configurata"}}, "success": true}}"#
        );
        match decode_comparison(StatusCode::OK, &body) {
            Err(AnalysisError::Api { message, .. }) => {
                assert_eq!(message, "API Key Gemini non configurata");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn empty_error_field_is_ignored() {
        let body = NLTK.replacen('{', r#"{"error": "", "#, 1);
        let response = decode_analysis(StatusCode::OK, &body).unwrap();
        assert_eq!(response.gulpease, 72.0);
    }

    #[test]
    fn bad_status_without_error_field() {
        let result = decode_analysis(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message": "boom"}"#);
        assert!(matches!(result, Err(AnalysisError::Status { status: 500, .. })));
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        let result = decode_analysis(StatusCode::OK, "<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(AnalysisError::JsonError(_))));
    }

    #[test]
    fn urls_join_without_double_slashes() {
        let client = AnalysisClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.build_url(Endpoint::AnalyzeGemini),
            "http://localhost:5000/api/analyze-gemini"
        );
    }
}

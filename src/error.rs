//! Error types for the text analysis client.

use thiserror::Error;

/// Errors that can occur while preparing, sending or decoding an analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The submitted text was empty or whitespace only.
    #[error("no text to analyze")]
    EmptyText,

    /// Another analysis is still in flight.
    #[error("an analysis is already in progress")]
    Busy,

    /// The backend answered with an `error` field.
    #[error("[Analysis API Error]: {message}")]
    Api {
        /// Error message reported by the backend
        message: String,
        /// Optional diagnostic details reported by the backend
        details: Option<String>,
    },

    /// The backend answered with a non-success status and no `error` field.
    #[error("Request failed with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Error occurred during an API request.
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error occurred when parsing JSON.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The configuration could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] figment::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AnalysisError {
    /// Returns true for errors raised before any network activity.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::EmptyText | Self::Busy)
    }
}

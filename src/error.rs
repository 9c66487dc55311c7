//! Error types for elta-tracker
//!
//! The taxonomy mirrors how failures are handled:
//! - [`Error::Network`] / [`Error::HttpStatus`] — transport-level failures, already
//!   past the retry layer by the time they surface
//! - [`Error::Format`] — response bytes were not valid JSON (endpoint contract break)
//! - [`Error::Config`] / [`Error::Io`] — setup and report-writing failures, fatal to
//!   the run since they mean loss of the work product
//!
//! Content anomalies (missing status flag, missing voucher key, partial events) are
//! never errors; the parser degrades them to empty or "N/A" values instead.

use thiserror::Error;

/// Result type alias for elta-tracker operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for elta-tracker
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "input_column")
        key: Option<String>,
    },

    /// Network error (connection, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Endpoint returned a non-success HTTP status after retries were exhausted
    #[error("endpoint returned HTTP {status}")]
    HttpStatus {
        /// The HTTP status code of the final response
        status: u16,
    },

    /// Response bytes were not valid JSON
    #[error("malformed tracking response: {0}")]
    Format(#[from] serde_json::Error),

    /// I/O error (reading voucher files, writing reports)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a configuration error with an associated key
    pub fn config(message: impl Into<String>, key: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.into()),
        }
    }
}

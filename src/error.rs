//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error, returned by fallible construction paths.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// HTTP-layer (transport) errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Timeout")]
    Timeout,

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Failure of a single fetch → parse pipeline run.
///
/// Never escapes `get_price_history`; the orchestrator recovers from both
/// variants by serving stale data or an empty series.
#[derive(Error, Debug)]
pub enum PriceHistoryError {
    #[error("Transport error: {0}")]
    Transport(#[from] HttpError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A single point in a batch that could not be read. Recovered by skipping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PointError {
    #[error("point is not a JSON object")]
    NotAnObject,

    #[error("invalid timestamp key {0:?}")]
    InvalidTimestamp(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not an integer: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("field `{field}` is negative: {value}")]
    NegativeVolume { field: &'static str, value: i64 },
}

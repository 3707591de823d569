//! Error types for talking to the posts API.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Failure of a single repository operation.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection refused, DNS failure, broken body stream and the like.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// `detail` holds the `detail` string of a JSON error body, when the
    /// server sent one.
    #[error("server returned {status}")]
    Status {
        status: StatusCode,
        detail: Option<String>,
    },

    /// A 2xx response whose body was not what we expected.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiError {
    /// Build a status error from a raw response body.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        Self::Status {
            status,
            detail: parse_detail(body),
        }
    }

    /// Server-supplied message, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// Pull a string `detail` out of an error body.
///
/// Validation failures put an array of objects in `detail`; only a plain
/// string counts as a user-facing message.
fn parse_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }
}

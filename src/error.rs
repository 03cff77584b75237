//! Error types for the ClickUp bridge
//!
//! Library code returns [`BridgeError`] through the crate-wide [`Result`].
//! Startup code (config loading, the server binary) uses `anyhow` instead.

use thiserror::Error;

use crate::resolver::ResolutionFailure;

/// Maximum number of characters of a response body or request payload kept
/// in an error message.
const PREVIEW_CHARS: usize = 300;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("ClickUp API error {status} {reason}: {body} | payload={payload}")]
    Api {
        status: u16,
        reason: String,
        body: String,
        payload: String,
    },

    #[error("ClickUp API request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected ClickUp response from {path}: {message}")]
    Decode { path: String, message: String },

    #[error("Invalid command payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No target configured for {0}")]
    MissingTarget(&'static str),

    #[error(transparent)]
    Resolution(#[from] ResolutionFailure),
}

impl BridgeError {
    pub fn api(status: reqwest::StatusCode, body: &str, payload: &str) -> Self {
        BridgeError::Api {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body: preview(body),
            payload: preview(payload),
        }
    }

    pub fn decode(path: &str, message: impl Into<String>) -> Self {
        BridgeError::Decode {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Truncate long text for logs and error messages.
pub(crate) fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

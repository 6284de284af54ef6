//! Error Types for Token Metrics tools
//!
//! Every failure an invocation can hit ends up as one [`ToolError`]:
//! bad caller input, transport trouble, an error status from the API, a
//! payload of the wrong shape, or a client that could not be configured.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ToolError>;

/// Longest server-provided error text carried into a message
const MAX_ERROR_TEXT: usize = 300;

/// Coarse classification of a [`ToolError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Network,
    Api,
    Parse,
    Config,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Missing or malformed caller input, caught before any request
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Connection, timeout or other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with an error
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body was not what the tool expected
    #[error("Unexpected response: expected {expected}, got {observed}")]
    Parse { expected: String, observed: String },

    /// Missing credentials or unusable settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// A required parameter was not supplied
    pub fn missing(field: &str) -> Self {
        Self::Validation(format!("missing required parameter '{field}'"))
    }

    pub fn parse(expected: impl Into<String>, observed: impl Into<String>) -> Self {
        Self::Parse {
            expected: expected.into(),
            observed: observed.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Network(_) => ErrorKind::Network,
            Self::Api { .. } => ErrorKind::Api,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status, for API errors
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Translate a transport-level failure
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let cause = error_chain(err);
        if err.is_timeout() {
            Self::Network(format!("request timed out: {cause}"))
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {cause}"))
        } else {
            Self::Network(cause)
        }
    }

    /// Translate a non-success response, pulling the server's own
    /// explanation out of the body when there is one
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = server_message(body).unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("request failed")
                .to_string()
        });
        Self::Api { status, message }
    }

    /// Single-line message for the agent
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => format!("Error: {msg}"),
            Self::Network(msg) => format!("Network error: {msg}. The request was not retried."),
            Self::Api { status, message } => format!("API Error ({status}): {message}"),
            Self::Parse { expected, observed } => {
                format!("Error: unexpected response from the API (expected {expected}, got {observed})")
            }
            Self::Config(msg) => format!("Configuration error: {msg}"),
        }
    }
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["detail", "message", "error"] {
            match map.get(key) {
                Some(Value::String(text)) if !text.trim().is_empty() => {
                    return Some(truncate(text.trim()));
                }
                Some(value @ (Value::Object(_) | Value::Array(_))) => {
                    return Some(truncate(&value.to_string()));
                }
                _ => {}
            }
        }
    }

    Some(truncate(body))
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_ERROR_TEXT {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_ERROR_TEXT).collect();
    cut.push_str("...");
    cut
}

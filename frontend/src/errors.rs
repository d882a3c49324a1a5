//! Error types for the auction workflow.

use serde_json::Value;
use thiserror::Error;

/// Failure of a call to the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server rejected the request with status {status}")]
    Rejected { status: u16, body: Option<Value> },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Body the server sent along with a rejection, when it was JSON
    pub fn body(&self) -> Option<&Value> {
        match self {
            ApiError::Rejected { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Misuse of a form or a form whose value cannot become a request payload
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Form field is not editable: {0}")]
    ReadOnlyField(String),

    #[error("No {0} form is open")]
    NotOpen(&'static str),

    #[error("Form value does not match the request payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// The page could not be constructed from its route
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Missing route parameter: {0}")]
    MissingRouteParam(&'static str),

    #[error("Invalid project id in route: {0}")]
    InvalidProjectId(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

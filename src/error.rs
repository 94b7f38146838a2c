//! Error types shared by the relay endpoints.
//!
//! `RelayError` is what handlers and the outbound clients return. Each
//! endpoint decides how a given variant is rendered to the caller, since the
//! contact form answers with `{error, details}` and the chatbot with `{reply}`.

use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

#[derive(Error, Debug)]
pub enum RelayError {
    /// The caller sent something we refuse to forward.
    #[error("{0}")]
    Validation(String),

    /// A required setting is absent. Carries the setting name, never its value.
    #[error("{0} is not configured")]
    Configuration(&'static str),

    /// The mail service or webhook answered with a failure status.
    #[error("{service} returned {status}")]
    Upstream {
        service: &'static str,
        status: String,
    },

    /// The mail service or webhook could not be reached at all.
    #[error("{service} unreachable: {reason}")]
    Transport {
        service: &'static str,
        reason: String,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Logs the error at a level matching whose fault it is.
    pub fn log(&self, endpoint: &'static str) {
        match self {
            RelayError::Validation(reason) => {
                tracing::info!(endpoint, %reason, "Rejected request");
            }
            RelayError::Configuration(setting) => {
                tracing::error!(endpoint, setting, "Endpoint is not configured");
            }
            other => {
                tracing::error!(endpoint, error = %other, "Relay failed");
            }
        }
    }
}

/// Errors raised while building the configuration at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("failed to create SMTP relay: {0}")]
    SmtpRelay(#[from] lettre::transport::smtp::Error),
}

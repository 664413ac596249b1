//! Error taxonomy for the registry core
//!
//! Every network-boundary failure is converted to one of these kinds
//! before it reaches the UI surface; raw transport errors never cross
//! the reconciler boundary.

use crate::http::HttpError;
use orion_domain::ValidationIssue;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    /// Rejected by the pre-flight gate, before any network call
    #[error("DOI is not well-formed: {input}")]
    MalformedDoi { input: String },

    /// Network-level failure (DNS, timeout, 5xx). Retryable, and
    /// distinct from "the registry has no such record".
    #[error("transport failure: {message}")]
    Transport { message: String },

    /// Response body did not match the expected wire shape
    #[error("invalid response payload: {message}")]
    Parse { message: String },

    /// Field-level rejection, client- or server-side
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<ValidationIssue>,
    },
}

impl RegistryError {
    pub fn transport(message: impl Into<String>) -> Self {
        RegistryError::Transport {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        RegistryError::Parse {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>, issues: Vec<ValidationIssue>) -> Self {
        RegistryError::Validation {
            message: message.into(),
            issues,
        }
    }

    /// Whether the UI should offer a retry rather than a correction
    pub fn is_retryable(&self) -> bool {
        matches!(self, RegistryError::Transport { .. })
    }
}

impl From<HttpError> for RegistryError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ParseError { message } => RegistryError::Parse { message },
            other => RegistryError::Transport {
                message: other.to_string(),
            },
        }
    }
}

//! Error types for the chat client.

use std::path::PathBuf;
use thiserror::Error;

/// Shown when the server gives no usable error message.
pub(crate) const GENERIC_FAILURE: &str = "Failed to get response";

/// Failure of a single `/chat` round trip.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExchangeError {
    /// The request never produced an HTTP response.
    #[error("{0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// A success status whose body does not have the expected shape.
    #[error("Malformed response from server: {0}")]
    Malformed(String),
}

impl ExchangeError {
    /// User-facing text. A blank server message falls back to the generic
    /// failure text.
    pub fn message(&self) -> String {
        match self {
            Self::Status { message, .. } if message.trim().is_empty() => {
                GENERIC_FAILURE.to_string()
            }
            _ => self.to_string(),
        }
    }
}


/// Errors surfaced to the front end.
///
/// Exchange failures after login never show up here: the chat controller
/// reports them inline in the transcript instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    /// Missing identity or query, or a submit the session cannot accept.
    #[error("{0}")]
    Validation(String),

    /// The validating exchange at login failed.
    #[error("{0}")]
    RejectedIdentity(String),
}

impl ChatError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("could not determine the user config directory")]
    NoConfigDir,
}

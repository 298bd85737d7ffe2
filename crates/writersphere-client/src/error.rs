//! Error types for writersphere-client

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Result type alias for writersphere-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the backend
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The backend rejected the request. Displays the backend's message as-is.
    #[error("{message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message taken from the error body.
        message: String,
        /// Backend error code, when one was given.
        code: Option<String>,
    },

    /// The operation needs a signed-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// A row or object that must exist was not returned.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transport-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body did not have the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Missing or invalid client configuration.
    #[error("{0}")]
    Config(String),

    /// Session file I/O failure.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Error from writersphere-core
    #[error(transparent)]
    Core(#[from] writersphere_core::Error),
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create an I/O error carrying the path.
    pub fn io_with_path(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Build an [`Error::Api`] from a non-success response body.
    ///
    /// The table API reports `message`; the auth API uses `msg`,
    /// `error_description`, or `error` depending on the endpoint.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let field = |key: &str| -> Option<String> {
            parsed
                .as_ref()
                .and_then(|v| v.get(key))
                .and_then(|v| match v {
                    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
        };

        let message = ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|key| field(key))
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        let code = field("error_code").or_else(|| field("code"));

        Self::Api {
            status,
            message,
            code,
        }
    }

    /// HTTP status of an API error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

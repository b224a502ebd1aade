//! Error types for the Harmonia server client.

use reqwest::header::HeaderMap;
use thiserror::Error;

/// Body text used in [`ClientError::Api`] when the server sent no body.
pub const NO_BODY: &str = "[no body]";

/// Errors that can occur when interacting with a Harmonia server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// A required path parameter was not supplied before sending
    #[error("Missing the required parameter '{parameter}' when calling {operation}")]
    MissingParameter {
        operation: &'static str,
        parameter: String,
    },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// The underlying HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// IO error while reading a response body or writing a download
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize a request body or parse a response body
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// The server answered with a non-2xx status
    #[error("{operation} call failed with: {status} - {body}")]
    Api {
        operation: &'static str,
        status: u16,
        headers: HeaderMap,
        body: String,
    },
}

impl ClientError {
    /// Status code of a server-reported failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

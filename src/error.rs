//! Failure kinds surfaced by every fallible operation in the crate.
//!
//! These are control-flow errors. The JSON-RPC error *object* that travels
//! on the wire is [`ErrorObject`](crate::ErrorObject); use
//! [`Error::to_error_object`] to turn a failure into the object a server
//! should answer with.

use crate::error_codes;
use crate::types::ErrorObject;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Structural failure returned by build, parse and lifecycle operations
#[derive(Debug, Error)]
pub enum Error {
    /// The call itself was malformed (caller contract violation)
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// The data does not satisfy the JSON-RPC 2.0 protocol invariants
    #[error("validation failed: {0}")]
    Validation(String),

    /// The tree library could not parse or serialize JSON text
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The caller-provided output buffer cannot hold the serialized text
    #[error("output buffer too small: {required} bytes required, {available} available")]
    BufferTooSmall { required: usize, available: usize },

    /// The input text exceeds the configured size limit
    #[error("message of {size} bytes exceeds the {limit} byte limit")]
    MessageTooLarge { size: usize, limit: usize },
}

impl Error {
    pub(crate) fn invalid_args(reason: impl Into<String>) -> Self {
        Self::InvalidArgs(reason.into())
    }

    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Check if this is a caller misuse failure
    pub fn is_invalid_args(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }

    /// Check if this is a protocol validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Map this failure onto the JSON-RPC error object a server would reply with.
    ///
    /// Malformed text becomes a parse error, anything that parsed but broke
    /// the protocol becomes an invalid request, and the rest is reported as
    /// an internal error. Details stay server-side.
    pub fn to_error_object(&self) -> ErrorObject {
        let (code, message) = match self {
            Self::Json(_) => (error_codes::PARSE_ERROR, "Parse error"),
            Self::Validation(_) | Self::MessageTooLarge { .. } => {
                (error_codes::INVALID_REQUEST, "Invalid Request")
            }
            Self::InvalidArgs(_) | Self::BufferTooSmall { .. } => {
                (error_codes::INTERNAL_ERROR, "Internal error")
            }
        };

        tracing::debug!(error = %self, code, "mapped failure to JSON-RPC error object");

        ErrorObject::from_parts(code, message.to_string(), None)
    }
}

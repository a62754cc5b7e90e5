//! Bridge error taxonomy
//!
//! Every variant canonicalizes to an [`ApiError`] before it crosses the
//! boundary, so callers only ever see framed `error` objects.

use thiserror::Error;
use tlbridge_actors::RuntimeError;
use tlbridge_codec::constants::codes;
use tlbridge_codec::{ApiError, DecodeError};

/// Failure delivered to a request continuation
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Request bytes did not parse; the actor never saw the request
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid request")]
    InvalidRequest,

    /// The actor's own error, passed through verbatim
    #[error("{0}")]
    Dispatch(ApiError),

    #[error("{type_name} cannot be executed synchronously")]
    NotContextFree { type_name: &'static str },

    #[error("request cancelled before completion")]
    Cancelled,

    #[error("runtime failure: {0}")]
    Runtime(#[from] RuntimeError),
}

impl BridgeError {
    pub fn code(&self) -> i32 {
        match self {
            Self::Decode(_) | Self::InvalidRequest | Self::NotContextFree { .. } => {
                codes::BAD_REQUEST
            }
            Self::Dispatch(error) => error.code,
            Self::Cancelled | Self::Runtime(_) => codes::INTERNAL,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<ApiError> for BridgeError {
    fn from(error: ApiError) -> Self {
        Self::Dispatch(error)
    }
}

impl From<&BridgeError> for ApiError {
    fn from(error: &BridgeError) -> Self {
        match error {
            BridgeError::Dispatch(error) => error.clone(),
            BridgeError::Decode(e) => ApiError::from(e),
            other => ApiError::new(other.code(), other.to_string()),
        }
    }
}

impl From<BridgeError> for ApiError {
    fn from(error: BridgeError) -> Self {
        match error {
            BridgeError::Dispatch(error) => error,
            other => ApiError::from(&other),
        }
    }
}

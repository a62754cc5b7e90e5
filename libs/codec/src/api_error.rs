//! The shared `error` object
//!
//! `error code:int32 message:string = Error;` is the one framed shape every
//! failure is canonicalized into before it crosses the boundary, whether it
//! came from decoding, from the bridge, or from the actor itself.

use crate::constants::{codes, ERROR_ID};
use crate::error::{DecodeError, DecodeResult};
use crate::object::{TlBare, TlConstructor};
use crate::parser::TlParser;
use crate::storer::TlStorer;
use thiserror::Error;

/// Failure payload: numeric code plus human-readable message
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(codes::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(codes::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, message)
    }
}

impl TlBare for ApiError {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(self.code);
        s.store_string(&self.message);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            code: p.fetch_i32()?,
            message: p.fetch_string()?,
        })
    }
}

impl TlConstructor for ApiError {
    const ID: u32 = ERROR_ID;
    const NAME: &'static str = "error";
}

impl From<DecodeError> for ApiError {
    fn from(error: DecodeError) -> Self {
        Self::bad_request(format!("decode failed: {error}"))
    }
}

impl From<&DecodeError> for ApiError {
    fn from(error: &DecodeError) -> Self {
        Self::bad_request(format!("decode failed: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_is_canonicalized_as_bad_request() {
        let api: ApiError = DecodeError::trailing_bytes(4, 8).into();
        assert_eq!(api.code, 400);
        assert!(api.message.starts_with("decode failed"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ApiError::not_found("no key").to_string(), "404: no key");
    }
}

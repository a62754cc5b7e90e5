//! Decode errors for TL framed objects
//!
//! Every variant records the byte offset at which parsing stopped so a
//! malformed request can be traced back to the exact field that broke it.
//! Decode errors never reach the actor: the bridge converts them straight
//! into a framed `error` object (see [`crate::ApiError`]).

use thiserror::Error;

/// TL decoding errors with the offset of the failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer ended before a complete value could be read
    #[error("Not enough data to read {context}: need {need} bytes, {available} available (offset: {offset})")]
    NotEnoughData {
        need: usize,
        available: usize,
        offset: usize,
        context: &'static str,
    },

    /// A complete object was read but input bytes remain
    #[error("Too much data to fetch: {remaining} trailing bytes after offset {offset}")]
    TrailingBytes { remaining: usize, offset: usize },

    /// Leading tag does not name any constructor of the expected type
    #[error("Unknown constructor {tag:#010x} for {expected} (offset: {offset})")]
    UnknownConstructor {
        tag: u32,
        offset: usize,
        expected: &'static str,
    },

    /// `string` field is not valid UTF-8
    #[error("Invalid UTF-8 in string field (offset: {offset})")]
    InvalidUtf8 { offset: usize },

    /// `Bool` field holds neither boolTrue nor boolFalse
    #[error("Invalid Bool constructor {tag:#010x} (offset: {offset})")]
    InvalidBool { tag: u32, offset: usize },

    /// Declared length or count cannot be represented
    #[error("Declared length {declared} is out of range (offset: {offset})")]
    LengthOverflow { declared: i64, offset: usize },
}

impl DecodeError {
    pub fn not_enough_data(
        need: usize,
        available: usize,
        offset: usize,
        context: &'static str,
    ) -> Self {
        Self::NotEnoughData {
            need,
            available,
            offset,
            context,
        }
    }

    pub fn trailing_bytes(remaining: usize, offset: usize) -> Self {
        Self::TrailingBytes { remaining, offset }
    }

    pub fn unknown_constructor(tag: u32, offset: usize, expected: &'static str) -> Self {
        Self::UnknownConstructor {
            tag,
            offset,
            expected,
        }
    }

    /// Offset in the input where decoding failed
    pub fn offset(&self) -> usize {
        match self {
            Self::NotEnoughData { offset, .. }
            | Self::TrailingBytes { offset, .. }
            | Self::UnknownConstructor { offset, .. }
            | Self::InvalidUtf8 { offset }
            | Self::InvalidBool { offset, .. }
            | Self::LengthOverflow { offset, .. } => *offset,
        }
    }
}

/// Result type for decode operations
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

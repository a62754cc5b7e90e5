//! # Framed Buffers - Encode / Decode Entry Points
//!
//! ## Purpose
//!
//! The unit of exchange across the system boundary is a [`Frame`]:
//! `tag:uint32 || payload`, with no length field. Encoding always runs the
//! two-pass storer so the frame is exactly `4 + payload_length` bytes;
//! decoding is strict and either yields a complete object or an error.
//!
//! ## Entry Points
//!
//! - [`encode`]: any boxed object (successful response) to a frame
//! - [`encode_error`]: any failure, canonicalized to the `error` object
//! - [`decode`]: a frame to a boxed object, rejecting trailing bytes
//! - [`decode_response`]: a frame to either the response type or `ApiError`

use crate::api_error::ApiError;
use crate::constants::{ERROR_ID, TAG_SIZE};
use crate::error::DecodeResult;
use crate::object::TlBoxed;
use crate::parser::TlParser;
use crate::storer::{CalcLength, SliceStorer, TlStorer};
use std::fmt;
use tracing::trace;

/// Exactly-sized encoded object
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Box<[u8]>,
}

impl Frame {
    /// Leading constructor tag
    pub fn tag(&self) -> u32 {
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&self.bytes[..TAG_SIZE]);
        u32::from_le_bytes(tag)
    }

    pub fn payload(&self) -> &[u8] {
        &self.bytes[TAG_SIZE..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Frames always carry a tag, so they are never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_error(&self) -> bool {
        self.tag() == ERROR_ID
    }

    pub fn into_boxed_slice(self) -> Box<[u8]> {
        self.bytes
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("tag", &format_args!("{:#010x}", self.tag()))
            .field("len", &self.len())
            .finish()
    }
}

/// Payload length of `object` (the frame is four bytes longer)
pub fn payload_length<T: TlBoxed>(object: &T) -> usize {
    let mut calc = CalcLength::new();
    object.store_payload(&mut calc);
    calc.length()
}

/// Two-pass encode: compute the exact length, allocate once, write
pub fn encode<T: TlBoxed>(object: &T) -> Frame {
    let len = TAG_SIZE + payload_length(object);
    let mut bytes = vec![0u8; len].into_boxed_slice();

    let mut storer = SliceStorer::new(&mut bytes);
    storer.store_u32(object.constructor_id());
    object.store_payload(&mut storer);
    debug_assert_eq!(storer.position(), len, "length and write passes disagree");

    trace!(
        tag = object.constructor_id(),
        type_name = object.type_name(),
        len,
        "Encoded TL object"
    );
    Frame { bytes }
}

/// Encode any failure as the framed `error` object
pub fn encode_error(error: impl Into<ApiError>) -> Frame {
    encode(&error.into())
}

/// Strict decode of exactly one boxed object
pub fn decode<T: TlBoxed>(bytes: &[u8]) -> DecodeResult<T> {
    let mut parser = TlParser::new(bytes);
    let object = T::fetch_boxed(&mut parser)?;
    parser.fetch_end()?;
    Ok(object)
}

/// Decode a response frame that may hold either `T` or the `error` object
pub fn decode_response<T: TlBoxed>(bytes: &[u8]) -> DecodeResult<Result<T, ApiError>> {
    match peek_tag(bytes) {
        Some(ERROR_ID) => decode::<ApiError>(bytes).map(Err),
        _ => decode::<T>(bytes).map(Ok),
    }
}

/// Leading tag of a frame, if at least four bytes are present
pub fn peek_tag(bytes: &[u8]) -> Option<u32> {
    let tag: [u8; TAG_SIZE] = bytes.get(..TAG_SIZE)?.try_into().ok()?;
    Some(u32::from_le_bytes(tag))
}

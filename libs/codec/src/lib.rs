//! # tlbridge Codec - TL Framed Object Encoding
//!
//! ## Purpose
//!
//! Encodes and decodes tagged binary objects (requests, responses and the
//! shared `error` object) to and from raw byte buffers:
//! - TL primitives with little-endian integers and padded byte strings
//! - Two-pass encoding: exact length first, then a single exact allocation
//! - Strict decoding: unknown tags, truncation and trailing bytes are errors
//! - Canonical `error` framing for every failure
//!
//! ## Architecture Role
//!
//! ```text
//! caller bytes → [decode] → Function → bridge → actor
//!                                                 ↓
//! caller ← Frame ← [encode / encode_error] ← Object | ApiError
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Any request or response catalog (declared by the wrapped client with
//!   [`tl_boxed_enum!`])
//! - Scheduling, threads or the foreign-function boundary

pub mod api_error;
pub mod constants;
pub mod error;
pub mod frame;
pub mod macros;
pub mod object;
pub mod parser;
pub mod schema;
pub mod storer;

pub use api_error::ApiError;
pub use constants::*;
pub use error::{DecodeError, DecodeResult};
pub use frame::{decode, decode_response, encode, encode_error, payload_length, peek_tag, Frame};
pub use object::{TlBare, TlBoxed, TlConstructor};
pub use parser::TlParser;
pub use schema::constructor_id;
pub use storer::{CalcLength, SliceStorer, TlStorer};

//! # TL Storers - Two-Pass Object Serialization
//!
//! ## Purpose
//!
//! Serialization is split into two passes that share one code path: every
//! object writes itself through the [`TlStorer`] trait, first into
//! [`CalcLength`] (which only counts bytes) and then into [`SliceStorer`]
//! (which writes into a buffer allocated with exactly that many bytes).
//!
//! ```text
//! object.store(CalcLength) → exact length → Box<[u8]> → object.store(SliceStorer)
//! ```
//!
//! Because both passes run the same `store` code, the computed length and the
//! written length cannot drift apart, and the output buffer never grows,
//! shrinks or over-allocates.

use crate::constants::{
    BOOL_FALSE_ID, BOOL_TRUE_ID, LONG_LENGTH_MARKER, MEDIUM_LENGTH_LIMIT, MEDIUM_LENGTH_MARKER,
    SHORT_LENGTH_LIMIT,
};

const PADDING: [u8; 3] = [0; 3];

/// Sink for TL primitives
///
/// Implementors only provide the raw byte and integer writers; the TL
/// encodings of `Bool`, `bytes` and `string` are derived from them.
pub trait TlStorer {
    fn store_raw(&mut self, bytes: &[u8]);

    fn store_u32(&mut self, value: u32) {
        self.store_raw(&value.to_le_bytes());
    }

    fn store_i32(&mut self, value: i32) {
        self.store_raw(&value.to_le_bytes());
    }

    fn store_i64(&mut self, value: i64) {
        self.store_raw(&value.to_le_bytes());
    }

    fn store_f64(&mut self, value: f64) {
        self.store_raw(&value.to_le_bytes());
    }

    fn store_bool(&mut self, value: bool) {
        self.store_u32(if value { BOOL_TRUE_ID } else { BOOL_FALSE_ID });
    }

    /// Length-prefixed byte string padded to a 4-byte boundary
    fn store_bytes(&mut self, bytes: &[u8]) {
        let len = bytes.len();
        let header_len = if len < SHORT_LENGTH_LIMIT {
            self.store_raw(&[len as u8]);
            1
        } else if len < MEDIUM_LENGTH_LIMIT {
            let l = (len as u32).to_le_bytes();
            self.store_raw(&[MEDIUM_LENGTH_MARKER, l[0], l[1], l[2]]);
            4
        } else {
            let l = (len as u64).to_le_bytes();
            self.store_raw(&[LONG_LENGTH_MARKER]);
            self.store_raw(&l[..7]);
            8
        };
        self.store_raw(bytes);
        self.store_raw(&PADDING[..padding_for(header_len + len)]);
    }

    fn store_string(&mut self, value: &str) {
        self.store_bytes(value.as_bytes());
    }
}

/// Bytes needed to pad `len` to the next multiple of four
pub(crate) fn padding_for(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Length-calculation pass: counts bytes without writing them
#[derive(Debug, Default, Clone, Copy)]
pub struct CalcLength {
    length: usize,
}

impl CalcLength {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl TlStorer for CalcLength {
    #[inline]
    fn store_raw(&mut self, bytes: &[u8]) {
        self.length += bytes.len();
    }

    #[inline]
    fn store_u32(&mut self, _value: u32) {
        self.length += 4;
    }

    #[inline]
    fn store_i32(&mut self, _value: i32) {
        self.length += 4;
    }

    #[inline]
    fn store_i64(&mut self, _value: i64) {
        self.length += 8;
    }

    #[inline]
    fn store_f64(&mut self, _value: f64) {
        self.length += 8;
    }
}

/// Write pass into a buffer that was sized by [`CalcLength`]
///
/// Writing past the end of the slice is a bug in the object's `store`
/// implementation (the two passes disagreed) and panics.
#[derive(Debug)]
pub struct SliceStorer<'a> {
    buf: &'a mut [u8],
    position: usize,
}

impl<'a> SliceStorer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, position: 0 }
    }

    /// Bytes written so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes still free in the target buffer
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.position
    }
}

impl TlStorer for SliceStorer<'_> {
    #[inline]
    fn store_raw(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        self.buf[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }
}

/// Growable storer for callers that do not need the exact-size guarantee
impl TlStorer for Vec<u8> {
    fn store_raw(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

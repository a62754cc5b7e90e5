//! # TL Parser - Strict Bounds-Checked Reading
//!
//! ## Purpose
//!
//! Reads TL primitives from a borrowed byte slice. Every read is bounds
//! checked and reports the offset where it failed; nothing is allocated for
//! a declared length until the bytes backing it are known to be present.
//!
//! A top-level decode is only successful when [`TlParser::fetch_end`] also
//! succeeds, i.e. the object consumed the input exactly.

use crate::constants::{
    BOOL_FALSE_ID, BOOL_TRUE_ID, LONG_LENGTH_MARKER, MEDIUM_LENGTH_MARKER, TAG_SIZE,
};
use crate::error::{DecodeError, DecodeResult};
use crate::storer::padding_for;

/// Cursor over a TL-encoded buffer
#[derive(Debug, Clone)]
pub struct TlParser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> TlParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    fn take(&mut self, len: usize, context: &'static str) -> DecodeResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(DecodeError::not_enough_data(
                len,
                self.remaining(),
                self.position,
                context,
            ));
        }
        let slice = &self.data[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self, context: &'static str) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N, context)?);
        Ok(out)
    }

    pub fn fetch_u32(&mut self) -> DecodeResult<u32> {
        self.take_array::<4>("int32").map(u32::from_le_bytes)
    }

    pub fn fetch_i32(&mut self) -> DecodeResult<i32> {
        self.take_array::<4>("int32").map(i32::from_le_bytes)
    }

    pub fn fetch_i64(&mut self) -> DecodeResult<i64> {
        self.take_array::<8>("int64").map(i64::from_le_bytes)
    }

    pub fn fetch_f64(&mut self) -> DecodeResult<f64> {
        self.take_array::<8>("double").map(f64::from_le_bytes)
    }

    pub fn fetch_bool(&mut self) -> DecodeResult<bool> {
        let offset = self.position;
        match self.fetch_u32()? {
            BOOL_TRUE_ID => Ok(true),
            BOOL_FALSE_ID => Ok(false),
            tag => Err(DecodeError::InvalidBool { tag, offset }),
        }
    }

    /// Borrowing variant of [`fetch_bytes`](Self::fetch_bytes)
    pub fn fetch_bytes_slice(&mut self) -> DecodeResult<&'a [u8]> {
        let offset = self.position;
        let first = self.take_array::<1>("bytes length")?[0];
        let (header_len, len) = match first {
            MEDIUM_LENGTH_MARKER => {
                let l = self.take_array::<3>("bytes length")?;
                (4, u32::from_le_bytes([l[0], l[1], l[2], 0]) as u64)
            }
            LONG_LENGTH_MARKER => {
                let l = self.take_array::<7>("bytes length")?;
                let mut wide = [0u8; 8];
                wide[..7].copy_from_slice(&l);
                (8, u64::from_le_bytes(wide))
            }
            short => (1, short as u64),
        };
        let len = usize::try_from(len).map_err(|_| DecodeError::LengthOverflow {
            declared: len as i64,
            offset,
        })?;
        let bytes = self.take(len, "bytes")?;
        self.take(padding_for(header_len + len), "bytes padding")?;
        Ok(bytes)
    }

    pub fn fetch_bytes(&mut self) -> DecodeResult<Vec<u8>> {
        self.fetch_bytes_slice().map(<[u8]>::to_vec)
    }

    pub fn fetch_string(&mut self) -> DecodeResult<String> {
        let offset = self.position;
        let bytes = self.fetch_bytes_slice()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| DecodeError::InvalidUtf8 { offset })
    }

    /// Bare vector: `int32` count followed by `count` elements
    pub fn fetch_vector<T, F>(&mut self, mut fetch: F) -> DecodeResult<Vec<T>>
    where
        F: FnMut(&mut Self) -> DecodeResult<T>,
    {
        let offset = self.position;
        let count = self.fetch_i32()?;
        if count < 0 {
            return Err(DecodeError::LengthOverflow {
                declared: count as i64,
                offset,
            });
        }
        // Elements usually take a word each; empty constructors take nothing
        let available = self.remaining();
        let mut items = Vec::with_capacity((count as usize).min(available / TAG_SIZE));
        for _ in 0..count {
            let start = self.position;
            items.push(fetch(self)?);
            // Empty elements may not outnumber the input bytes
            if self.position == start && count as usize > available {
                return Err(DecodeError::LengthOverflow {
                    declared: count as i64,
                    offset,
                });
            }
        }
        Ok(items)
    }

    /// Fails if any input remains unconsumed
    pub fn fetch_end(&self) -> DecodeResult<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(DecodeError::trailing_bytes(remaining, self.position)),
        }
    }
}

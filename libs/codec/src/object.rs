//! Tagged object traits
//!
//! A *bare* value is a payload without a tag. A *constructor* is a bare value
//! with a fixed 32-bit id. A *boxed* value is written as `id || payload` and
//! read by dispatching on the leading id; request and response catalogs are
//! boxed sum types, usually generated with [`tl_boxed_enum!`](crate::tl_boxed_enum).

use crate::error::{DecodeError, DecodeResult};
use crate::parser::TlParser;
use crate::storer::TlStorer;

/// Untagged TL value
pub trait TlBare: Sized {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S);
    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self>;
}

/// Single TL constructor with a fixed id
pub trait TlConstructor: TlBare {
    const ID: u32;
    /// Schema name, e.g. `kv.get`
    const NAME: &'static str;
}

/// Value that is framed as `constructor id || payload`
pub trait TlBoxed: Sized {
    fn constructor_id(&self) -> u32;

    fn type_name(&self) -> &'static str;

    /// Writes the payload only, without the constructor id
    fn store_payload<S: TlStorer + ?Sized>(&self, s: &mut S);

    /// Reads the constructor id and the matching payload
    fn fetch_boxed(p: &mut TlParser<'_>) -> DecodeResult<Self>;

    fn store_boxed<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_u32(self.constructor_id());
        self.store_payload(s);
    }
}

impl<T: TlConstructor> TlBoxed for T {
    fn constructor_id(&self) -> u32 {
        T::ID
    }

    fn type_name(&self) -> &'static str {
        T::NAME
    }

    fn store_payload<S: TlStorer + ?Sized>(&self, s: &mut S) {
        self.store_bare(s);
    }

    fn fetch_boxed(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        let offset = p.position();
        let tag = p.fetch_u32()?;
        if tag != T::ID {
            return Err(DecodeError::unknown_constructor(tag, offset, T::NAME));
        }
        T::fetch_bare(p)
    }
}

impl TlBare for i32 {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(*self);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        p.fetch_i32()
    }
}

impl TlBare for i64 {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i64(*self);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        p.fetch_i64()
    }
}

impl TlBare for f64 {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_f64(*self);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        p.fetch_f64()
    }
}

impl TlBare for bool {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_bool(*self);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        p.fetch_bool()
    }
}

impl TlBare for String {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_string(self);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        p.fetch_string()
    }
}

/// Bare `vector<T>`; `bytes` fields use [`TlStorer::store_bytes`] instead
///
/// The TL count is an `int32`: storing more than `i32::MAX` elements panics
/// rather than writing a truncated count.
impl<T: TlBare> TlBare for Vec<T> {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        let count = match i32::try_from(self.len()) {
            Ok(count) => count,
            Err(_) => panic!("vector of {} elements exceeds the TL int32 count", self.len()),
        };
        s.store_i32(count);
        for item in self {
            item.store_bare(s);
        }
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        p.fetch_vector(T::fetch_bare)
    }
}

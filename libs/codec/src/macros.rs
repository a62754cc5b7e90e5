//! Boxed Sum Type Generation Macro
//!
//! Provides `tl_boxed_enum!` for declaring the request (`Function`) and
//! response (`Object`) catalogs of a wrapped client as Rust enums.
//!
//! ## Usage Example
//!
//! ```rust
//! use tlbridge_codec::{tl_boxed_enum, ApiError};
//!
//! tl_boxed_enum! {
//!     /// Everything the service can answer with
//!     #[derive(Debug, Clone, PartialEq)]
//!     pub enum Object {
//!         Error(ApiError),
//!     }
//! }
//! ```
//!
//! Every variant wraps exactly one [`TlConstructor`](crate::TlConstructor);
//! the generated `fetch_boxed` reads the leading tag and dispatches to the
//! variant whose `ID` matches, failing with `UnknownConstructor` otherwise.
//! `From<Variant>` is generated for each wrapped type.

/// Generate a boxed TL sum type over constructor structs
#[macro_export]
macro_rules! tl_boxed_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident($ty:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant($ty),
            )+
        }

        impl $crate::TlBoxed for $name {
            fn constructor_id(&self) -> u32 {
                match self {
                    $(Self::$variant(_) => <$ty as $crate::TlConstructor>::ID,)+
                }
            }

            fn type_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => <$ty as $crate::TlConstructor>::NAME,)+
                }
            }

            fn store_payload<S: $crate::TlStorer + ?Sized>(&self, s: &mut S) {
                match self {
                    $(Self::$variant(value) => $crate::TlBare::store_bare(value, s),)+
                }
            }

            fn fetch_boxed(p: &mut $crate::TlParser<'_>) -> $crate::DecodeResult<Self> {
                let offset = p.position();
                let tag = p.fetch_u32()?;
                $(
                    if tag == <$ty as $crate::TlConstructor>::ID {
                        return <$ty as $crate::TlBare>::fetch_bare(p).map(Self::$variant);
                    }
                )+
                Err($crate::DecodeError::unknown_constructor(
                    tag,
                    offset,
                    stringify!($name),
                ))
            }
        }

        $(
            impl From<$ty> for $name {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

//! TL wire constants

/// Size of the leading constructor tag of every framed object
pub const TAG_SIZE: usize = 4;

/// `error code:int32 message:string = Error;`
pub const ERROR_ID: u32 = 0x9bdd8f1a;

/// `boolTrue = Bool;`
pub const BOOL_TRUE_ID: u32 = 0x997275b5;

/// `boolFalse = Bool;`
pub const BOOL_FALSE_ID: u32 = 0xbc799737;

/// Lengths below this fit in the one-byte `bytes` prefix
pub const SHORT_LENGTH_LIMIT: usize = 254;

/// Marker for a three-byte `bytes` length
pub const MEDIUM_LENGTH_MARKER: u8 = 0xfe;

/// Lengths below this fit in the three-byte `bytes` prefix
pub const MEDIUM_LENGTH_LIMIT: usize = 1 << 24;

/// Marker for a seven-byte `bytes` length
pub const LONG_LENGTH_MARKER: u8 = 0xff;

/// Error codes carried in framed `error` objects
pub mod codes {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const INTERNAL: i32 = 500;
}

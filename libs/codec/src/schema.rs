//! Constructor id derivation
//!
//! A TL constructor id is the CRC32 of its schema line with the trailing
//! `;` removed and whitespace collapsed, e.g.
//! `error code:int32 message:string = Error`. Catalogs hard-code their ids as
//! constants and use [`constructor_id`] in tests to check them.

/// CRC32 id of a TL schema line
pub fn constructor_id(schema_line: &str) -> u32 {
    let normalized = schema_line
        .trim()
        .trim_end_matches(';')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    crc32fast::hash(normalized.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BOOL_FALSE_ID, BOOL_TRUE_ID, ERROR_ID};

    #[test]
    fn test_builtin_ids_match_schema() {
        assert_eq!(constructor_id("error code:int32 message:string = Error;"), ERROR_ID);
        assert_eq!(constructor_id("boolTrue = Bool"), BOOL_TRUE_ID);
        assert_eq!(constructor_id("boolFalse = Bool"), BOOL_FALSE_ID);
    }

    #[test]
    fn test_whitespace_is_normalized() {
        assert_eq!(
            constructor_id("  error   code:int32 message:string =  Error ; "),
            ERROR_ID
        );
    }
}

//! # tlbridge Codec Integration Tests
//!
//! Verifies the framing contract through the public API only:
//! - Round trip of boxed requests and responses
//! - Frame length is always payload length + 4
//! - Strict decoding (trailing bytes, unknown and mismatched tags)
//! - Canonical error framing

use proptest::prelude::*;
use tlbridge_codec::{
    constructor_id, decode, decode_response, encode, encode_error, payload_length, tl_boxed_enum,
    ApiError, DecodeError, DecodeResult, TlBare, TlConstructor, TlParser, TlStorer, ERROR_ID,
};

#[derive(Debug, Clone, PartialEq)]
struct Echo {
    text: String,
    blob: Vec<u8>,
    values: Vec<i64>,
}

impl TlBare for Echo {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_string(&self.text);
        s.store_bytes(&self.blob);
        self.values.store_bare(s);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            text: p.fetch_string()?,
            blob: p.fetch_bytes()?,
            values: Vec::fetch_bare(p)?,
        })
    }
}

impl TlConstructor for Echo {
    const ID: u32 = 0x5f3b_2a10;
    const NAME: &'static str = "echo";
}

#[derive(Debug, Clone, PartialEq)]
struct Reset;

impl TlBare for Reset {
    fn store_bare<S: TlStorer + ?Sized>(&self, _s: &mut S) {}

    fn fetch_bare(_p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self)
    }
}

impl TlConstructor for Reset {
    const ID: u32 = 0x0c0f_fee0;
    const NAME: &'static str = "reset";
}

#[derive(Debug, Clone, PartialEq)]
struct Echoed {
    text: String,
    flag: bool,
}

impl TlBare for Echoed {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_string(&self.text);
        s.store_bool(self.flag);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            text: p.fetch_string()?,
            flag: p.fetch_bool()?,
        })
    }
}

impl TlConstructor for Echoed {
    const ID: u32 = 0x7a7a_0001;
    const NAME: &'static str = "echoed";
}

tl_boxed_enum! {
    #[derive(Debug, Clone, PartialEq)]
    enum Function {
        Echo(Echo),
        Reset(Reset),
    }
}

tl_boxed_enum! {
    #[derive(Debug, Clone, PartialEq)]
    enum Object {
        Echoed(Echoed),
        Error(ApiError),
    }
}

fn sample_echo() -> Function {
    Function::Echo(Echo {
        text: "hello".into(),
        blob: vec![1, 2, 3, 4, 5],
        values: vec![-1, 0, i64::MAX],
    })
}

#[test]
fn test_function_round_trip() {
    let function = sample_echo();
    let frame = encode(&function);
    assert_eq!(frame.tag(), Echo::ID);
    assert_eq!(decode::<Function>(frame.as_bytes()).unwrap(), function);

    let reset = encode(&Function::Reset(Reset));
    assert_eq!(reset.len(), 4);
    assert_eq!(decode::<Function>(reset.as_bytes()).unwrap(), Function::Reset(Reset));
}

#[test]
fn test_frame_length_is_payload_plus_tag() {
    let function = sample_echo();
    let frame = encode(&function);
    assert_eq!(frame.len(), 4 + payload_length(&function));
    assert_eq!(frame.payload().len(), payload_length(&function));
    assert_eq!(frame.len() % 4, 0);
}

#[test]
fn test_trailing_bytes_are_rejected() {
    let mut bytes = encode(&sample_echo()).as_bytes().to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    assert!(matches!(
        decode::<Function>(&bytes),
        Err(DecodeError::TrailingBytes { remaining: 4, .. })
    ));
}

#[test]
fn test_truncated_payload_is_rejected() {
    let bytes = encode(&sample_echo()).as_bytes().to_vec();
    for cut in [1, 4, 5, bytes.len() - 1] {
        assert!(
            decode::<Function>(&bytes[..cut]).is_err(),
            "prefix of {cut} bytes must not decode"
        );
    }
}

#[test]
fn test_response_tag_is_not_a_function() {
    let response = encode(&Object::Echoed(Echoed {
        text: "x".into(),
        flag: true,
    }));
    assert_eq!(
        decode::<Function>(response.as_bytes()).unwrap_err(),
        DecodeError::unknown_constructor(Echoed::ID, 0, "Function")
    );
}

#[test]
fn test_decode_response_splits_success_and_error() {
    let ok = encode(&Object::Echoed(Echoed {
        text: "done".into(),
        flag: false,
    }));
    assert!(matches!(
        decode_response::<Object>(ok.as_bytes()).unwrap(),
        Ok(Object::Echoed(_))
    ));

    let failed = encode_error(ApiError::new(13, "actor failed"));
    assert_eq!(
        decode_response::<Object>(failed.as_bytes()).unwrap(),
        Err(ApiError::new(13, "actor failed"))
    );
}

#[test]
fn test_empty_input_frames_as_decode_failure() {
    let error = decode::<Function>(&[]).unwrap_err();
    let frame = encode_error(error);
    assert_eq!(frame.tag(), ERROR_ID);
    assert!(!frame.payload().is_empty());

    let api = decode::<ApiError>(frame.as_bytes()).unwrap();
    assert_eq!(api.code, 400);
    assert!(api.message.contains("decode failed"));
}

#[test]
fn test_encoding_is_deterministic() {
    assert_eq!(encode(&sample_echo()), encode(&sample_echo()));
}

#[test]
fn test_error_id_matches_schema() {
    assert_eq!(
        constructor_id("error code:int32 message:string = Error;"),
        <ApiError as TlConstructor>::ID
    );
}

proptest! {
    #[test]
    fn prop_echo_round_trip(
        text in ".{0,300}",
        blob in proptest::collection::vec(any::<u8>(), 0..600),
        values in proptest::collection::vec(any::<i64>(), 0..16),
    ) {
        let function = Function::Echo(Echo { text, blob, values });
        let frame = encode(&function);
        prop_assert_eq!(frame.len(), 4 + payload_length(&function));
        prop_assert_eq!(frame.len() % 4, 0);
        prop_assert_eq!(decode::<Function>(frame.as_bytes()).unwrap(), function);
    }

    #[test]
    fn prop_trailing_garbage_never_decodes(extra in proptest::collection::vec(any::<u8>(), 1..16)) {
        let mut bytes = encode(&sample_echo()).as_bytes().to_vec();
        bytes.extend_from_slice(&extra);
        prop_assert!(decode::<Function>(&bytes).is_err());
    }
}

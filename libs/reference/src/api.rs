//! Reference catalog
//!
//! ```text
//! ok = Ok;
//! pong nonce:int64 = Pong;
//! logVerbosityLevel verbosity_level:int32 = LogVerbosityLevel;
//! kv.value key:string value:bytes = kv.Value;
//! ---functions---
//! setLogVerbosityLevel new_verbosity_level:int32 = Ok;
//! getLogVerbosityLevel = LogVerbosityLevel;
//! ping nonce:int64 = Pong;
//! kv.set key:string value:bytes = Ok;
//! kv.get key:string = kv.Value;
//! sleep milliseconds:int32 = Ok;
//! ```

use tlbridge_codec::{
    tl_boxed_enum, ApiError, DecodeResult, TlBare, TlConstructor, TlParser, TlStorer,
};

/// `ok = Ok`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OkObject;

impl TlBare for OkObject {
    fn store_bare<S: TlStorer + ?Sized>(&self, _s: &mut S) {}

    fn fetch_bare(_p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self)
    }
}

impl TlConstructor for OkObject {
    const ID: u32 = 0xd4ed_be69;
    const NAME: &'static str = "ok";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pong {
    pub nonce: i64,
}

impl TlBare for Pong {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i64(self.nonce);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            nonce: p.fetch_i64()?,
        })
    }
}

impl TlConstructor for Pong {
    const ID: u32 = 0x842c_c302;
    const NAME: &'static str = "pong";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogVerbosityLevel {
    pub verbosity_level: i32,
}

impl TlBare for LogVerbosityLevel {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(self.verbosity_level);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            verbosity_level: p.fetch_i32()?,
        })
    }
}

impl TlConstructor for LogVerbosityLevel {
    const ID: u32 = 0x6764_43ea;
    const NAME: &'static str = "logVerbosityLevel";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl TlBare for KvValue {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_string(&self.key);
        s.store_bytes(&self.value);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            key: p.fetch_string()?,
            value: p.fetch_bytes()?,
        })
    }
}

impl TlConstructor for KvValue {
    const ID: u32 = 0xabaa_48b4;
    const NAME: &'static str = "kv.value";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetLogVerbosityLevel {
    pub new_verbosity_level: i32,
}

impl TlBare for SetLogVerbosityLevel {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(self.new_verbosity_level);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            new_verbosity_level: p.fetch_i32()?,
        })
    }
}

impl TlConstructor for SetLogVerbosityLevel {
    const ID: u32 = 0xedea_07d2;
    const NAME: &'static str = "setLogVerbosityLevel";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GetLogVerbosityLevel;

impl TlBare for GetLogVerbosityLevel {
    fn store_bare<S: TlStorer + ?Sized>(&self, _s: &mut S) {}

    fn fetch_bare(_p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self)
    }
}

impl TlConstructor for GetLogVerbosityLevel {
    const ID: u32 = 0x2368_9ae4;
    const NAME: &'static str = "getLogVerbosityLevel";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ping {
    pub nonce: i64,
}

impl TlBare for Ping {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i64(self.nonce);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            nonce: p.fetch_i64()?,
        })
    }
}

impl TlConstructor for Ping {
    const ID: u32 = 0xf6dd_9982;
    const NAME: &'static str = "ping";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvSet {
    pub key: String,
    pub value: Vec<u8>,
}

impl TlBare for KvSet {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_string(&self.key);
        s.store_bytes(&self.value);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            key: p.fetch_string()?,
            value: p.fetch_bytes()?,
        })
    }
}

impl TlConstructor for KvSet {
    const ID: u32 = 0xd301_622b;
    const NAME: &'static str = "kv.set";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvGet {
    pub key: String,
}

impl TlBare for KvGet {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_string(&self.key);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            key: p.fetch_string()?,
        })
    }
}

impl TlConstructor for KvGet {
    const ID: u32 = 0xec5a_0414;
    const NAME: &'static str = "kv.get";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sleep {
    pub milliseconds: i32,
}

impl TlBare for Sleep {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(self.milliseconds);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            milliseconds: p.fetch_i32()?,
        })
    }
}

impl TlConstructor for Sleep {
    const ID: u32 = 0x2ad9_e853;
    const NAME: &'static str = "sleep";
}

tl_boxed_enum! {
    /// Requests accepted by the reference client
    #[derive(Debug, Clone, PartialEq)]
    pub enum Function {
        SetLogVerbosityLevel(SetLogVerbosityLevel),
        GetLogVerbosityLevel(GetLogVerbosityLevel),
        Ping(Ping),
        KvSet(KvSet),
        KvGet(KvGet),
        Sleep(Sleep),
    }
}

tl_boxed_enum! {
    /// Responses produced by the reference client
    #[derive(Debug, Clone, PartialEq)]
    pub enum Object {
        Ok(OkObject),
        Pong(Pong),
        LogVerbosityLevel(LogVerbosityLevel),
        KvValue(KvValue),
        Error(ApiError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlbridge_codec::{constructor_id, decode, encode};

    #[test]
    fn test_constructor_ids_match_schema() {
        let schema: [(u32, &str); 10] = [
            (OkObject::ID, "ok = Ok;"),
            (Pong::ID, "pong nonce:int64 = Pong;"),
            (
                LogVerbosityLevel::ID,
                "logVerbosityLevel verbosity_level:int32 = LogVerbosityLevel;",
            ),
            (KvValue::ID, "kv.value key:string value:bytes = kv.Value;"),
            (
                SetLogVerbosityLevel::ID,
                "setLogVerbosityLevel new_verbosity_level:int32 = Ok;",
            ),
            (
                GetLogVerbosityLevel::ID,
                "getLogVerbosityLevel = LogVerbosityLevel;",
            ),
            (Ping::ID, "ping nonce:int64 = Pong;"),
            (KvSet::ID, "kv.set key:string value:bytes = Ok;"),
            (KvGet::ID, "kv.get key:string = kv.Value;"),
            (Sleep::ID, "sleep milliseconds:int32 = Ok;"),
        ];
        for (id, line) in schema {
            assert_eq!(id, constructor_id(line), "{line}");
        }
    }

    #[test]
    fn test_kv_set_wire_layout() {
        let frame = encode(&Function::KvSet(KvSet {
            key: "a".into(),
            value: vec![1, 2, 3],
        }));
        assert_eq!(
            frame.as_bytes(),
            &[
                0x2b, 0x62, 0x01, 0xd3, // kv.set
                1, b'a', 0, 0, // key
                3, 1, 2, 3, // value
            ]
        );
        assert!(matches!(
            decode::<Function>(frame.as_bytes()).unwrap(),
            Function::KvSet(KvSet { ref key, .. }) if key == "a"
        ));
    }
}

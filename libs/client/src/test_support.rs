//! Small catalog and actor shared by unit tests

use async_trait::async_trait;
use std::time::Duration;
use tlbridge_actors::{Reply, RpcActor};
use tlbridge_codec::{
    tl_boxed_enum, ApiError, DecodeResult, TlBare, TlConstructor, TlParser, TlStorer,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Add {
    pub a: i32,
    pub b: i32,
}

impl TlBare for Add {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(self.a);
        s.store_i32(self.b);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            a: p.fetch_i32()?,
            b: p.fetch_i32()?,
        })
    }
}

impl TlConstructor for Add {
    const ID: u32 = 0x2000_0001;
    const NAME: &'static str = "test.add";
}

/// Counted by the actor, answered after `ms` milliseconds
#[derive(Debug, Clone, PartialEq)]
pub struct Hold {
    pub ms: i32,
    pub tag: i32,
}

impl TlBare for Hold {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(self.ms);
        s.store_i32(self.tag);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            ms: p.fetch_i32()?,
            tag: p.fetch_i32()?,
        })
    }
}

impl TlConstructor for Hold {
    const ID: u32 = 0x2000_0002;
    const NAME: &'static str = "test.hold";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fail {
    pub code: i32,
}

impl TlBare for Fail {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(self.code);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            code: p.fetch_i32()?,
        })
    }
}

impl TlConstructor for Fail {
    const ID: u32 = 0x2000_0003;
    const NAME: &'static str = "test.fail";
}

#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub value: i32,
}

impl TlBare for Value {
    fn store_bare<S: TlStorer + ?Sized>(&self, s: &mut S) {
        s.store_i32(self.value);
    }

    fn fetch_bare(p: &mut TlParser<'_>) -> DecodeResult<Self> {
        Ok(Self {
            value: p.fetch_i32()?,
        })
    }
}

impl TlConstructor for Value {
    const ID: u32 = 0x2000_0004;
    const NAME: &'static str = "test.value";
}

tl_boxed_enum! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum Function {
        Add(Add),
        Hold(Hold),
        Fail(Fail),
    }
}

tl_boxed_enum! {
    #[derive(Debug, Clone, PartialEq)]
    pub enum Object {
        Value(Value),
        Error(ApiError),
    }
}

/// Answers `Add` anywhere, `Hold` with the number of holds seen so far
#[derive(Debug, Default)]
pub struct CountingActor {
    holds: i32,
    refuse_start: bool,
}

impl CountingActor {
    /// Actor whose `on_start` fails, leaving its mailbox closed
    pub fn refusing_start() -> Self {
        Self {
            holds: 0,
            refuse_start: true,
        }
    }
}

#[async_trait(?Send)]
impl RpcActor for CountingActor {
    type Function = Function;
    type Object = Object;

    fn handle(&mut self, request: Function) -> Reply<Object> {
        match request {
            Function::Hold(Hold { ms, tag }) => {
                self.holds += 1;
                let seen = self.holds;
                Box::pin(async move {
                    if ms > 0 {
                        tokio::time::sleep(Duration::from_millis(ms as u64)).await;
                    }
                    Ok(Object::Value(Value {
                        value: tag * 1000 + seen,
                    }))
                })
            }
            Function::Fail(Fail { code }) => {
                Box::pin(async move { Err(ApiError::new(code, "requested failure")) })
            }
            other => Box::pin(async move { Self::handle_now(other) }),
        }
    }

    fn handle_now(request: Function) -> Result<Object, ApiError> {
        match request {
            Function::Add(Add { a, b }) => Ok(Object::Value(Value {
                value: a.wrapping_add(b),
            })),
            other => Err(ApiError::bad_request(format!("{other:?} needs the actor"))),
        }
    }

    fn is_context_free(request: &Function) -> bool {
        matches!(request, Function::Add(_))
    }

    async fn on_start(&mut self) -> Result<(), ApiError> {
        if self.refuse_start {
            return Err(ApiError::internal("refused to start"));
        }
        Ok(())
    }
}

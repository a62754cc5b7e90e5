//! Reference actor
//!
//! Keeps a small key/value store on the scheduler thread. Log verbosity is
//! process-wide and handled without the actor.

use crate::api::{
    Function, GetLogVerbosityLevel, KvGet, KvSet, KvValue, LogVerbosityLevel, Object, OkObject,
    Ping, Pong, SetLogVerbosityLevel, Sleep,
};
use async_trait::async_trait;
use futures::future::{self, FutureExt};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::Duration;
use tlbridge_actors::{Reply, RpcActor};
use tlbridge_codec::{ApiError, TlBoxed};
use tracing::{debug, info};

pub const DEFAULT_VERBOSITY: i32 = 1;
pub const MAX_VERBOSITY: i32 = 1024;

static LOG_VERBOSITY: AtomicI32 = AtomicI32::new(DEFAULT_VERBOSITY);

fn ready(result: Result<Object, ApiError>) -> Reply<Object> {
    future::ready(result).boxed_local()
}

#[derive(Debug, Default)]
pub struct ReferenceActor {
    store: HashMap<String, Vec<u8>>,
}

impl ReferenceActor {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl RpcActor for ReferenceActor {
    type Function = Function;
    type Object = Object;

    fn handle(&mut self, request: Function) -> Reply<Object> {
        match request {
            Function::Ping(Ping { nonce }) => ready(Ok(Object::Pong(Pong { nonce }))),
            Function::KvSet(KvSet { key, value }) => {
                debug!(key = %key, len = value.len(), "kv.set");
                self.store.insert(key, value);
                ready(Ok(Object::Ok(OkObject)))
            }
            Function::KvGet(KvGet { key }) => {
                let result = match self.store.get(&key) {
                    Some(value) => Ok(Object::KvValue(KvValue {
                        value: value.clone(),
                        key,
                    })),
                    None => Err(ApiError::not_found(format!("key {key:?} not found"))),
                };
                ready(result)
            }
            Function::Sleep(Sleep { milliseconds }) => {
                if milliseconds < 0 {
                    return ready(Err(ApiError::bad_request(
                        "milliseconds must not be negative",
                    )));
                }
                Box::pin(async move {
                    tokio::time::sleep(Duration::from_millis(milliseconds as u64)).await;
                    Ok(Object::Ok(OkObject))
                })
            }
            context_free => ready(Self::handle_now(context_free)),
        }
    }

    fn handle_now(request: Function) -> Result<Object, ApiError> {
        match request {
            Function::SetLogVerbosityLevel(SetLogVerbosityLevel {
                new_verbosity_level,
            }) => {
                if !(0..=MAX_VERBOSITY).contains(&new_verbosity_level) {
                    return Err(ApiError::bad_request(format!(
                        "verbosity level must be between 0 and {MAX_VERBOSITY}"
                    )));
                }
                LOG_VERBOSITY.store(new_verbosity_level, Ordering::Relaxed);
                Ok(Object::Ok(OkObject))
            }
            Function::GetLogVerbosityLevel(GetLogVerbosityLevel) => {
                Ok(Object::LogVerbosityLevel(LogVerbosityLevel {
                    verbosity_level: LOG_VERBOSITY.load(Ordering::Relaxed),
                }))
            }
            other => Err(ApiError::bad_request(format!(
                "{} requires the client context",
                other.type_name()
            ))),
        }
    }

    fn is_context_free(request: &Function) -> bool {
        matches!(
            request,
            Function::SetLogVerbosityLevel(_) | Function::GetLogVerbosityLevel(_)
        )
    }

    async fn on_start(&mut self) -> Result<(), ApiError> {
        info!("Reference actor started");
        Ok(())
    }

    async fn on_stop(&mut self) -> Result<(), ApiError> {
        info!(keys = self.store.len(), "Reference actor stopped");
        Ok(())
    }
}

//! Byte-level adapter between callers and the bridge
//!
//! Requests arrive as raw TL bytes and leave as framed responses. Every path
//! through this module produces exactly one well-formed [`Frame`]: either
//! the response object or a canonical `error` object.

use crate::client::Client;
use crate::error::BridgeError;
use tlbridge_actors::RpcActor;
use tlbridge_codec::{decode, encode, encode_error, Frame, TlBoxed};
use tracing::debug;

/// Decode request bytes; absent bytes are an `InvalidRequest`
pub fn decode_request<F: TlBoxed>(bytes: Option<&[u8]>) -> Result<F, BridgeError> {
    let bytes = bytes.ok_or(BridgeError::InvalidRequest)?;
    Ok(decode::<F>(bytes)?)
}

/// Frame a response or its failure
pub fn frame_result<O: TlBoxed>(result: Result<O, BridgeError>) -> Frame {
    match result {
        Ok(object) => encode(&object),
        Err(error) => encode_error(error),
    }
}

/// Decode `bytes`, submit the request and deliver the framed reply
///
/// Decode failures complete on the calling thread without reaching the
/// scheduler.
pub fn run_bytes<A, C>(client: &Client<A>, bytes: Option<&[u8]>, continuation: C)
where
    A: RpcActor,
    C: FnOnce(Frame) + Send + 'static,
{
    let deliver = move |result: Result<A::Object, BridgeError>| continuation(frame_result(result));

    match bytes.map(decode::<A::Function>) {
        None => client.send(None, deliver),
        Some(Ok(request)) => client.send(Some(request), deliver),
        Some(Err(e)) => {
            debug!(
                actor_id = %client.actor_id(),
                error = %e,
                offset = e.offset(),
                "Request rejected at decode"
            );
            client.record_rejected();
            deliver(Err(BridgeError::Decode(e)));
        }
    }
}

/// Decode and answer a context-free request synchronously
pub fn execute_bytes<A: RpcActor>(bytes: Option<&[u8]>) -> Frame {
    let result = decode_request::<A::Function>(bytes).and_then(Client::<A>::execute);
    if let Err(e) = &result {
        debug!(error = %e, "Synchronous request failed");
    }
    frame_result(result)
}

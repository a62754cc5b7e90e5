//! C boundary
//!
//! Generic building blocks for the `extern "C"` surface generated by
//! [`export_client_abi!`](crate::export_client_abi). Buffers handed out as
//! [`ExecutionResult`] are owned by the receiver and must be passed to
//! [`release_response`] exactly once.

use crate::boundary;
use crate::client::Client;
use crate::logging::init_tracing;
use once_cell::sync::OnceCell;
use std::ffi::c_void;
use std::ptr;
use tlbridge_actors::RpcActor;
use tlbridge_codec::{decode_response, peek_tag, ApiError, DecodeResult, Frame, TlBoxed};
use tlbridge_config::{BridgeConfig, LoggingConfig};
use tracing::{error, info, warn};

/// Framed buffer crossing the C boundary
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct ExecutionResult {
    pub data_ptr: *const c_void,
    pub data_len: u64,
}

/// Continuation invoked once per `run` call; owns the result it receives
pub type Callback = unsafe extern "C" fn(context: *mut c_void, result: ExecutionResult);

impl ExecutionResult {
    /// Hand ownership of `frame` to the caller
    pub fn from_frame(frame: Frame) -> Self {
        let bytes = frame.into_boxed_slice();
        let data_len = bytes.len() as u64;
        let data_ptr = Box::into_raw(bytes) as *mut u8 as *const c_void;
        Self { data_ptr, data_len }
    }

    pub fn null() -> Self {
        Self {
            data_ptr: ptr::null(),
            data_len: 0,
        }
    }

    pub fn is_null(&self) -> bool {
        self.data_ptr.is_null()
    }
}

/// Free a buffer produced by [`ExecutionResult::from_frame`]
///
/// A null buffer is ignored.
///
/// # Safety
///
/// `result` must come from [`ExecutionResult::from_frame`] and must not have
/// been released before.
pub unsafe fn release_response(result: ExecutionResult) {
    if result.is_null() {
        return;
    }
    let slice = ptr::slice_from_raw_parts_mut(result.data_ptr as *mut u8, result.data_len as usize);
    drop(Box::from_raw(slice));
}

/// Move-only owner of an [`ExecutionResult`]; releases it on drop
#[derive(Debug)]
pub struct ResponseHandle {
    result: ExecutionResult,
}

// The buffer is uniquely owned heap memory
unsafe impl Send for ResponseHandle {}

impl ResponseHandle {
    /// # Safety
    ///
    /// Same contract as [`release_response`]: the handle becomes the single
    /// owner of `result`.
    pub unsafe fn from_raw(result: ExecutionResult) -> Self {
        Self { result }
    }

    pub fn from_frame(frame: Frame) -> Self {
        Self {
            result: ExecutionResult::from_frame(frame),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        if self.result.is_null() {
            return &[];
        }
        unsafe {
            std::slice::from_raw_parts(
                self.result.data_ptr as *const u8,
                self.result.data_len as usize,
            )
        }
    }

    pub fn tag(&self) -> Option<u32> {
        peek_tag(self.as_bytes())
    }

    pub fn decode<O: TlBoxed>(&self) -> DecodeResult<Result<O, ApiError>> {
        decode_response::<O>(self.as_bytes())
    }

    /// Give up ownership without releasing
    pub fn into_raw(self) -> ExecutionResult {
        let result = self.result;
        std::mem::forget(self);
        result
    }
}

impl Drop for ResponseHandle {
    fn drop(&mut self) {
        unsafe { release_response(self.result) }
    }
}

#[derive(Clone, Copy)]
struct SendPtr(*mut c_void);

// Opaque caller context, only handed back to the caller's own callback
unsafe impl Send for SendPtr {}

struct ForeignContinuation {
    callback: Callback,
    context: SendPtr,
}

impl ForeignContinuation {
    fn deliver(self, frame: Frame) {
        unsafe { (self.callback)(self.context.0, ExecutionResult::from_frame(frame)) }
    }
}

static PROCESS_CONFIG: OnceCell<BridgeConfig> = OnceCell::new();

/// Load configuration and install logging once per process
pub fn process_config() -> &'static BridgeConfig {
    PROCESS_CONFIG.get_or_init(|| match BridgeConfig::from_env() {
        Ok(config) => {
            init_tracing(&config.logging);
            config
        }
        Err(e) => {
            init_tracing(&LoggingConfig::default());
            warn!(error = %format!("{e:#}"), "Falling back to default bridge configuration");
            BridgeConfig::default()
        }
    })
}

/// Construct a client and return it as an opaque handle
///
/// Aborts the process when the client cannot be constructed.
pub fn create_client<A, F>(factory: F) -> *mut c_void
where
    A: RpcActor,
    F: FnOnce() -> A + Send + 'static,
{
    let config = process_config();
    match Client::with_config(factory, config) {
        Ok(client) => {
            info!(actor_id = %client.actor_id(), "Client handle created");
            Box::into_raw(Box::new(client)) as *mut c_void
        }
        Err(e) => {
            error!(error = %e, "Failed to construct client, aborting");
            std::process::abort();
        }
    }
}

/// # Safety
///
/// `client` must be null or a handle from [`create_client`] for the same
/// actor type, not deleted before and not in use by another thread.
pub unsafe fn delete_client<A: RpcActor>(client: *mut c_void) {
    if client.is_null() {
        warn!("delete_client called with a null handle");
        return;
    }
    drop(Box::from_raw(client as *mut Client<A>));
}

/// Decode and submit a request; `callback` fires exactly once
///
/// A null request pointer completes with `InvalidRequest`, an empty request
/// with a decode failure.
///
/// # Safety
///
/// `client` must be a live handle from [`create_client`] for the same actor
/// type. `request` must be null or point to `request_len` readable bytes for
/// the duration of the call.
pub unsafe fn run<A: RpcActor>(
    client: *mut c_void,
    request: *const u8,
    request_len: u64,
    callback: Option<Callback>,
    context: *mut c_void,
) {
    let Some(callback) = callback else {
        error!("run called without a callback, request ignored");
        return;
    };
    let continuation = ForeignContinuation {
        callback,
        context: SendPtr(context),
    };

    let Some(client) = (client as *const Client<A>).as_ref() else {
        error!("run called with a null client handle");
        continuation.deliver(boundary::frame_result::<A::Object>(Err(
            crate::BridgeError::InvalidRequest,
        )));
        return;
    };

    let bytes = request_bytes(request, request_len);
    boundary::run_bytes(client, bytes, move |frame| continuation.deliver(frame));
}

/// Answer a context-free request synchronously
///
/// # Safety
///
/// `request` must be null or point to `request_len` readable bytes.
pub unsafe fn execute<A: RpcActor>(request: *const u8, request_len: u64) -> ExecutionResult {
    let bytes = request_bytes(request, request_len);
    ExecutionResult::from_frame(boundary::execute_bytes::<A>(bytes))
}

unsafe fn request_bytes<'a>(request: *const u8, request_len: u64) -> Option<&'a [u8]> {
    if request.is_null() {
        return None;
    }
    Some(std::slice::from_raw_parts(request, request_len as usize))
}

/// Export the C surface for one actor type
///
/// ```ignore
/// tlbridge_client::export_client_abi!(tlb, ReferenceActor, ReferenceActor::new);
/// ```
///
/// generates `tlb_create_client`, `tlb_delete_client`, `tlb_run`,
/// `tlb_execute` and `tlb_release_response`.
#[macro_export]
macro_rules! export_client_abi {
    ($prefix:ident, $actor:ty, $factory:expr) => {
        $crate::paste::paste! {
            /// Create a client handle; aborts on failure
            #[no_mangle]
            pub extern "C" fn [<$prefix _create_client>]() -> *mut ::std::ffi::c_void {
                $crate::ffi::create_client::<$actor, _>($factory)
            }

            /// # Safety
            ///
            /// `client` must come from the matching create call and must not
            /// be used afterwards.
            #[no_mangle]
            pub unsafe extern "C" fn [<$prefix _delete_client>](client: *mut ::std::ffi::c_void) {
                $crate::ffi::delete_client::<$actor>(client)
            }

            /// # Safety
            ///
            /// `client` must be live; `request` must be null or readable for
            /// `request_len` bytes during the call.
            #[no_mangle]
            pub unsafe extern "C" fn [<$prefix _run>](
                client: *mut ::std::ffi::c_void,
                request: *const u8,
                request_len: u64,
                callback: ::std::option::Option<$crate::ffi::Callback>,
                context: *mut ::std::ffi::c_void,
            ) {
                $crate::ffi::run::<$actor>(client, request, request_len, callback, context)
            }

            /// # Safety
            ///
            /// `request` must be null or readable for `request_len` bytes.
            #[no_mangle]
            pub unsafe extern "C" fn [<$prefix _execute>](
                request: *const u8,
                request_len: u64,
            ) -> $crate::ffi::ExecutionResult {
                $crate::ffi::execute::<$actor>(request, request_len)
            }

            /// # Safety
            ///
            /// `result` must come from this library and be released once.
            #[no_mangle]
            pub unsafe extern "C" fn [<$prefix _release_response>](
                result: $crate::ffi::ExecutionResult,
            ) {
                $crate::ffi::release_response(result)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlbridge_codec::{encode_error, ERROR_ID};

    #[test]
    fn test_execution_result_round_trip() {
        let frame = encode_error(ApiError::not_found("missing"));
        let expected = frame.as_bytes().to_vec();

        let result = ExecutionResult::from_frame(frame);
        assert!(!result.is_null());
        assert_eq!(result.data_len as usize, expected.len());

        let handle = unsafe { ResponseHandle::from_raw(result) };
        assert_eq!(handle.as_bytes(), expected.as_slice());
        assert_eq!(handle.tag(), Some(ERROR_ID));
        assert_eq!(
            handle.decode::<ApiError>().unwrap(),
            Err(ApiError::not_found("missing"))
        );
    }

    #[test]
    fn test_release_ignores_null() {
        unsafe { release_response(ExecutionResult::null()) };
        let handle = unsafe { ResponseHandle::from_raw(ExecutionResult::null()) };
        assert!(handle.as_bytes().is_empty());
        assert_eq!(handle.tag(), None);
    }

    #[test]
    fn test_into_raw_transfers_ownership() {
        let handle = ResponseHandle::from_frame(encode_error(ApiError::internal("boom")));
        let raw = handle.into_raw();
        unsafe { release_response(raw) };
    }
}

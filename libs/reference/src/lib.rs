//! # tlbridge Reference Client
//!
//! A small catalog ([`api`]) and actor ([`ReferenceActor`]) that exercise the
//! bridge end to end, exported over the C ABI with the `tlb` prefix:
//!
//! ```c
//! void *tlb_create_client(void);
//! void tlb_delete_client(void *client);
//! void tlb_run(void *client, const uint8_t *request, uint64_t request_len,
//!              void (*callback)(void *context, ExecutionResult result),
//!              void *context);
//! ExecutionResult tlb_execute(const uint8_t *request, uint64_t request_len);
//! void tlb_release_response(ExecutionResult result);
//! ```

pub mod actor;
pub mod api;

pub use actor::ReferenceActor;
pub use api::{Function, Object};

tlbridge_client::export_client_abi!(tlb, ReferenceActor, ReferenceActor::new);

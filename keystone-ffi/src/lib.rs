//! # Keystone FFI
//!
//! C ABI boundary adapter for the Keystone backend, intended to be loaded by
//! a mobile application shell. The exported surface is five functions:
//! pool initialization, user creation, user lookup, login, and string
//! release (see `include/keystone.h`).
//!
//! ## Envelope Contract
//!
//! Every operation that returns a buffer returns a NUL-terminated JSON
//! envelope, never NULL:
//!
//! ```json
//! {"status":"ok","data":{...}}
//! {"status":"error","error":{"kind":"conflict","message":"Email already exists"}}
//! ```
//!
//! ## Memory Management
//!
//! Ownership of each returned buffer passes to the caller, who must release
//! it exactly once with `keystone_string_free`. Issued pointers are tracked
//! so a repeated or unknown release is a logged no-op instead of memory
//! corruption.
//!
//! ## Fault Containment
//!
//! No panic crosses the ABI: every entry point runs under `catch_unwind`
//! and converts faults into `internal` error envelopes.
//!
//! ## Module Organization
//!
//! - `envelope`: Success/error envelope serialization
//! - `runtime`: Global tokio runtime and pool handle
//! - `strings`: C-string marshalling and the transfer buffer registry
//! - `user_ffi`: The exported `extern "C"` operations

pub mod envelope;
pub mod runtime;
pub mod strings;
pub mod user_ffi;

pub use strings::keystone_string_free;
pub use user_ffi::{keystone_create_user, keystone_get_user_by_id, keystone_init_pool, keystone_login};

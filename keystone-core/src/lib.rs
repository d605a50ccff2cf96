//! # Keystone Core
//!
//! This crate contains the native backend behind the Keystone mobile FFI
//! surface: connection pooling, the user store, and the authentication
//! service. The `keystone-ffi` crate wraps these services in a C ABI; this
//! crate knows nothing about the boundary and can be embedded directly in
//! Rust hosts and tests.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing and verification
//! - `service`: Account and session services (validation + orchestration)
//! - `db`: SQLite connection pool and migrations
//! - `config`: Configuration management
//! - `error`: Common error types

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod service;

/// Current version of the Keystone core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}

//! Identity provider gateway.
//!
//! This crate verifies bearer credentials against a hosted GoTrue-style auth
//! service and provides a caching wrapper so hot credentials are not
//! re-verified on every request:
//!
//! - [`AuthClient`] - the remote verifier ([`chat_core::IdentityVerifier`])
//! - [`CachedVerifier`] - wraps any verifier with a short-TTL cache; a cache
//!   miss simply re-verifies, so the cache is never correctness-critical
//! - [`AuthConfig`] - configuration loaded from the environment

mod cached;
mod client;
mod config;

pub use cached::CachedVerifier;
pub use client::AuthClient;
pub use config::AuthConfig;

//! # Claims Client
//!
//! HTTP transport for the claims backend.
//!
//! Handles:
//! - JSON requests with `reqwest`, bounded by the configured timeout
//! - the `Authorization: Bearer` header when a token is configured
//! - turning failed responses into `ClaimsError::Transport`, preferring the
//!   server's `{ "error": "..." }` message
//!
//! Implements [`claims_core::ClaimsApi`], so the core workflows run unchanged on top of it.

#![warn(rust_2018_idioms)]

mod transport;

pub use transport::HttpClaimsApi;

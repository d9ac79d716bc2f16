//! HTTP adapter for the capability traits in [`crate::api`].
//!
//! Requests go through a [`Transport`] so the client can be exercised in
//! tests without a server. [`ReqwestTransport`] is the production transport.

mod client;
mod rate_limiter;
mod transport;

pub use client::{ApiClient, ApiClientBuilder};
pub use rate_limiter::RateLimiter;
pub use transport::{
    Method, MockResponse, MockTransport, RawResponse, ReqwestTransport, Request, Transport,
};

//! Outbound rewrite of AI-gateway calls.
//!
//! Application code written against the hosted platform addresses its AI
//! traffic to a sentinel gateway URL. This crate recognizes that sentinel,
//! strips the gateway-only headers and re-routes the call to the real
//! upstream provider, leaving everything else (method, credential headers,
//! streaming bodies) untouched. Non-sentinel traffic passes through
//! unmodified.

mod client;
pub use client::GatewayClient;

mod global;
pub use global::{fetch, install, is_installed, uninstall, wrap_count};

mod routes;
pub use routes::{GATEWAY_BASE_URL, STRIPPED_HEADERS, upstream_base};

//! Shared building blocks for the service-binding health probes.
//!
//! Each probe binary resolves credentials from `VCAP_SERVICES`, drives one
//! [`backend::Backend`] through a write/read round trip and reports the
//! outcome over HTTP.

pub mod backend;
pub mod binding;
pub mod config;
pub mod error;
pub mod fake;
pub mod handler;
pub mod middleware;
pub mod probe;
pub mod tracing;

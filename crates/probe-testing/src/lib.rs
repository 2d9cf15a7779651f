//! Test utilities for the probe services.
//!
//! Provides `VCAP_SERVICES` fixtures and ready-made probe states over the
//! in-memory fake backend. Import from tests only — never in production code.

pub mod fixture;

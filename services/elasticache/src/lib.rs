pub mod config;
pub mod infra;
pub mod state;

/// Name used in response bodies.
pub const SERVICE_DISPLAY_NAME: &str = "Elasticache";

/// Canary key written and deleted by every probe.
pub const CANARY_KEY: &str = "foo";
pub const CANARY_VALUE: &str = "bar";

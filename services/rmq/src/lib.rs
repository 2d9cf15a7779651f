pub mod config;
pub mod infra;
pub mod state;

/// Name used in response bodies.
pub const SERVICE_DISPLAY_NAME: &str = "RMQ";

/// Queue declared by every probe unless `RMQ_QUEUE_NAME` is set.
pub const DEFAULT_QUEUE_NAME: &str = "aChannel";

/// Message published and fetched back.
pub const CANARY_MESSAGE: &str = "a value";

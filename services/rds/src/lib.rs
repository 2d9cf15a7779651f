pub mod config;
pub mod infra;
pub mod state;

/// Name used in response bodies.
pub const SERVICE_DISPLAY_NAME: &str = "RDS";

/// Table dropped and recreated by every probe unless `DB_TABLE_NAME` is set.
pub const DEFAULT_TABLE_NAME: &str = "test_table";

/// Row inserted into the canary table.
pub const CANARY_NAME: &str = "Fred";

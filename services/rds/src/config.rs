use probe_core::config::{PlatformConfig, required};

use crate::DEFAULT_TABLE_NAME;
use crate::infra::postgres::validate_table_name;

/// RDS probe configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RdsConfig {
    pub platform: PlatformConfig,
    /// Binding name to probe. Env var: `DB_SERVICENAME`.
    pub service_name: String,
    /// Canary table (default `test_table`). Env var: `DB_TABLE_NAME`.
    pub table_name: String,
}

impl RdsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// # Panics
    ///
    /// Panics if `DB_SERVICENAME` is missing or `DB_TABLE_NAME` is not a
    /// plain SQL identifier.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let table_name = lookup("DB_TABLE_NAME")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TABLE_NAME.to_owned());
        if let Err(e) = validate_table_name(&table_name) {
            panic!("DB_TABLE_NAME: {e}");
        }
        Self {
            service_name: required(&lookup, "DB_SERVICENAME"),
            table_name,
            platform: PlatformConfig::from_lookup(lookup),
        }
    }
}

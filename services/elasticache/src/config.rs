use probe_core::config::{PlatformConfig, required};

/// Elasticache probe configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ElasticacheConfig {
    pub platform: PlatformConfig,
    /// Binding name to probe. Env var: `ELASTICACHE_SERVICE_NAME`.
    pub service_name: String,
}

impl ElasticacheConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            service_name: required(&lookup, "ELASTICACHE_SERVICE_NAME"),
            platform: PlatformConfig::from_lookup(lookup),
        }
    }
}

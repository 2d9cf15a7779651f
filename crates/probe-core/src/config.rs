use tracing::{debug, warn};

use crate::binding::CredentialResolver;

/// Listen port used when `PORT` is unset or unparseable.
pub const DEFAULT_PORT: u16 = 8080;

/// Settings every probe takes from the hosting platform.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// TCP port to listen on. Env var: `PORT`.
    pub port: u16,
    /// Raw service-binding catalog. Env var: `VCAP_SERVICES`.
    pub vcap_services: Option<String>,
}

impl PlatformConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            port: parse_or(&lookup, "PORT", DEFAULT_PORT),
            vcap_services: lookup("VCAP_SERVICES"),
        }
    }

    /// Parse the catalog once. A bad catalog is logged here and reported
    /// again by every probe request.
    pub fn resolver(&self) -> CredentialResolver {
        let resolver = CredentialResolver::from_vcap(self.vcap_services.as_deref());
        match resolver.catalog() {
            Ok(catalog) => debug!(instances = catalog.instance_count(), "service catalog loaded"),
            Err(e) => warn!(error = %e, "service catalog unavailable"),
        }
        resolver
    }

    pub fn listen_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Read `key` and parse it, falling back to `default` when absent or invalid.
pub fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a required variable.
///
/// # Panics
///
/// Panics if the variable is missing or empty.
pub fn required<F>(lookup: &F, key: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| panic!("{key} must be set"))
}

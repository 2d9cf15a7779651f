use std::time::Duration;

use probe_core::config::{PlatformConfig, parse_or, required};

use crate::DEFAULT_QUEUE_NAME;
use crate::infra::amqp::DEFAULT_RECEIVE_TIMEOUT;

/// RMQ probe configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct RmqConfig {
    pub platform: PlatformConfig,
    /// Binding name to probe. Env var: `RMQ_SERVICENAME`.
    pub service_name: String,
    /// Queue declared for the canary message (default `aChannel`).
    /// Env var: `RMQ_QUEUE_NAME`.
    pub queue_name: String,
    /// How long to wait for the canary to come back (default 5s).
    /// Env var: `RMQ_RECEIVE_TIMEOUT_SECS`.
    pub receive_timeout: Duration,
}

impl RmqConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = parse_or(
            &lookup,
            "RMQ_RECEIVE_TIMEOUT_SECS",
            DEFAULT_RECEIVE_TIMEOUT.as_secs(),
        );
        let receive_timeout = match timeout_secs {
            0 => DEFAULT_RECEIVE_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        Self {
            service_name: required(&lookup, "RMQ_SERVICENAME"),
            queue_name: lookup("RMQ_QUEUE_NAME")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_QUEUE_NAME.to_owned()),
            receive_timeout,
            platform: PlatformConfig::from_lookup(lookup),
        }
    }
}

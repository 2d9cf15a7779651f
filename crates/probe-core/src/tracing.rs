use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset: probe outcomes are logged at
/// `info`, failures at `warn`.
pub const DEFAULT_FILTER: &str = "info";

/// Install the JSON subscriber the probe services log through. Each probe
/// run ends in one `info` or `warn` line carrying the service name and the
/// failed stage.
///
/// A second call leaves the first subscriber in place.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json())
        .try_init();
}

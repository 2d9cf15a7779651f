use probe_core::handler::ProbeState;
use probe_core::probe::{Canary, Probe};

use crate::config::ElasticacheConfig;
use crate::infra::redis::RedisBackend;
use crate::{CANARY_KEY, CANARY_VALUE, SERVICE_DISPLAY_NAME};

pub type AppState = ProbeState<RedisBackend>;

pub fn build_probe(config: &ElasticacheConfig) -> Probe {
    Probe::new(
        config.service_name.clone(),
        Canary::new(CANARY_KEY, CANARY_VALUE),
        config.platform.resolver(),
    )
}

pub fn build_state(config: &ElasticacheConfig) -> AppState {
    ProbeState::new(build_probe(config), SERVICE_DISPLAY_NAME, RedisBackend::new)
}

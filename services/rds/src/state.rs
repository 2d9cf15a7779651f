use probe_core::handler::ProbeState;
use probe_core::probe::{Canary, Probe};

use crate::config::RdsConfig;
use crate::infra::postgres::PostgresBackend;
use crate::{CANARY_NAME, SERVICE_DISPLAY_NAME};

pub type AppState = ProbeState<PostgresBackend>;

pub fn build_probe(config: &RdsConfig) -> Probe {
    Probe::new(
        config.service_name.clone(),
        Canary::new(config.table_name.clone(), CANARY_NAME),
        config.platform.resolver(),
    )
}

pub fn build_state(config: &RdsConfig) -> AppState {
    ProbeState::new(build_probe(config), SERVICE_DISPLAY_NAME, PostgresBackend::new)
}

use probe_core::handler::ProbeState;
use probe_core::probe::{Canary, Probe};

use crate::config::RmqConfig;
use crate::infra::amqp::RmqBackend;
use crate::{CANARY_MESSAGE, SERVICE_DISPLAY_NAME};

pub type AppState = ProbeState<RmqBackend>;

/// The canary key is the queue name: the message goes out through the
/// default exchange with the queue as routing key.
pub fn build_probe(config: &RmqConfig) -> Probe {
    Probe::new(
        config.service_name.clone(),
        Canary::new(config.queue_name.clone(), CANARY_MESSAGE),
        config.platform.resolver(),
    )
}

pub fn build_state(config: &RmqConfig) -> AppState {
    let queue = config.queue_name.clone();
    let receive_timeout = config.receive_timeout;
    ProbeState::new(build_probe(config), SERVICE_DISPLAY_NAME, move || {
        RmqBackend::new(queue.clone(), receive_timeout)
    })
}

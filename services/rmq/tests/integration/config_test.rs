use std::collections::HashMap;
use std::time::Duration;

use probe_rmq::config::RmqConfig;
use probe_rmq::state::{build_probe, build_state};
use probe_testing::fixture::{RMQ_SERVICE_NAME, rmq_catalog};

fn env(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn should_apply_defaults() {
    let config = RmqConfig::from_lookup(env(&[("RMQ_SERVICENAME", RMQ_SERVICE_NAME.to_owned())]));
    assert_eq!(config.queue_name, "aChannel");
    assert_eq!(config.receive_timeout, Duration::from_secs(5));
    assert_eq!(config.platform.port, 8080);
}

#[test]
fn should_read_overrides() {
    let config = RmqConfig::from_lookup(env(&[
        ("RMQ_SERVICENAME", RMQ_SERVICE_NAME.to_owned()),
        ("RMQ_QUEUE_NAME", "probe-queue".to_owned()),
        ("RMQ_RECEIVE_TIMEOUT_SECS", "12".to_owned()),
        ("VCAP_SERVICES", rmq_catalog().to_string()),
    ]));
    assert_eq!(config.queue_name, "probe-queue");
    assert_eq!(config.receive_timeout, Duration::from_secs(12));

    let probe = build_probe(&config);
    assert_eq!(probe.canary().key, "probe-queue");
    assert_eq!(probe.canary().value, "a value");

    let backend = build_state(&config).backend();
    assert_eq!(backend.queue(), "probe-queue");
    assert!(!backend.is_connected());
}

#[test]
fn should_ignore_zero_timeout() {
    let config = RmqConfig::from_lookup(env(&[
        ("RMQ_SERVICENAME", RMQ_SERVICE_NAME.to_owned()),
        ("RMQ_RECEIVE_TIMEOUT_SECS", "0".to_owned()),
    ]));
    assert_eq!(config.receive_timeout, Duration::from_secs(5));
}

#[test]
#[should_panic(expected = "RMQ_SERVICENAME must be set")]
fn should_require_service_name() {
    RmqConfig::from_lookup(env(&[]));
}

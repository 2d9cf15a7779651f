use std::collections::HashMap;

use probe_elasticache::config::ElasticacheConfig;
use probe_elasticache::state::build_probe;
use probe_testing::fixture::{ELASTICACHE_SERVICE_NAME, elasticache_catalog};

fn env(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn should_load_config_and_resolve_binding() {
    let config = ElasticacheConfig::from_lookup(env(&[
        ("PORT", "3000".to_owned()),
        ("ELASTICACHE_SERVICE_NAME", ELASTICACHE_SERVICE_NAME.to_owned()),
        ("VCAP_SERVICES", elasticache_catalog().to_string()),
    ]));
    assert_eq!(config.platform.port, 3000);
    assert_eq!(config.service_name, ELASTICACHE_SERVICE_NAME);

    let probe = build_probe(&config);
    assert_eq!(probe.service_name(), ELASTICACHE_SERVICE_NAME);
    assert_eq!(probe.canary().key, "foo");
    assert_eq!(probe.canary().value, "bar");
}

#[test]
#[should_panic(expected = "ELASTICACHE_SERVICE_NAME must be set")]
fn should_require_service_name() {
    ElasticacheConfig::from_lookup(env(&[]));
}

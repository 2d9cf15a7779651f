use std::collections::HashMap;

use probe_rds::config::RdsConfig;
use probe_rds::state::build_probe;
use probe_testing::fixture::{RDS_SERVICE_NAME, rds_catalog};

fn env(vars: &[(&str, String)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), v.clone()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn should_default_table_name() {
    let config = RdsConfig::from_lookup(env(&[
        ("DB_SERVICENAME", RDS_SERVICE_NAME.to_owned()),
        ("VCAP_SERVICES", rds_catalog().to_string()),
    ]));
    assert_eq!(config.table_name, "test_table");

    let probe = build_probe(&config);
    assert_eq!(probe.canary().key, "test_table");
    assert_eq!(probe.canary().value, "Fred");
}

#[test]
fn should_read_table_name_override() {
    let config = RdsConfig::from_lookup(env(&[
        ("DB_SERVICENAME", RDS_SERVICE_NAME.to_owned()),
        ("DB_TABLE_NAME", "probe_canary".to_owned()),
    ]));
    assert_eq!(config.table_name, "probe_canary");
}

#[test]
#[should_panic(expected = "DB_TABLE_NAME")]
fn should_reject_unsafe_table_name() {
    RdsConfig::from_lookup(env(&[
        ("DB_SERVICENAME", RDS_SERVICE_NAME.to_owned()),
        ("DB_TABLE_NAME", "x; DROP TABLE users".to_owned()),
    ]));
}

#[test]
#[should_panic(expected = "DB_SERVICENAME must be set")]
fn should_require_service_name() {
    RdsConfig::from_lookup(env(&[]));
}

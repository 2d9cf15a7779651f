//! `VCAP_SERVICES` fixtures for the three probe scenarios.

use probe_core::binding::CredentialResolver;
use probe_core::fake::FakeBackend;
use probe_core::handler::ProbeState;
use probe_core::probe::{Canary, Probe};
use serde_json::{Value, json};

pub const ELASTICACHE_SERVICE_NAME: &str = "test-elasticache";
pub const RDS_SERVICE_NAME: &str = "test-psql";
pub const RMQ_SERVICE_NAME: &str = "test-rmq";

/// Single Redis binding: `redis_host:6379`, password `redis_password`.
pub fn elasticache_catalog() -> Value {
    json!({
        "elasticache": [{
            "credentials": {
                "host": "redis_host",
                "port": 6379,
                "password": "redis_password"
            },
            "label": "elasticache",
            "name": ELASTICACHE_SERVICE_NAME
        }]
    })
}

/// Single PostgreSQL binding on `test_host`, database `test_db`.
pub fn rds_catalog() -> Value {
    json!({
        "rds": [{
            "credentials": {
                "db_name": "test_db",
                "host": "test_host",
                "password": "test_password",
                "uri": "you don't want to use this",
                "username": "test_user"
            },
            "label": "rds",
            "name": RDS_SERVICE_NAME
        }]
    })
}

/// The RDS binding as some brokers emit it: `user` instead of `username`
/// and `name` instead of `db_name`.
pub fn rds_catalog_with_short_keys() -> Value {
    json!({
        "rds": [{
            "credentials": {
                "name": "test_db",
                "host": "test_host",
                "password": "test_password",
                "uri": "you don't want to use this",
                "user": "test_user"
            },
            "label": "rds",
            "name": RDS_SERVICE_NAME
        }]
    })
}

/// Single RabbitMQ binding at `amqp://foobar`, no TLS.
pub fn rmq_catalog() -> Value {
    json!({
        "rabbitmq": [{
            "credentials": {
                "ssl": false,
                "uri": "amqp://foobar"
            },
            "label": "rabbitmq",
            "name": RMQ_SERVICE_NAME,
            "tags": ["rabbitmq"]
        }]
    })
}

/// Resolver over a fixture catalog, as if it came from `VCAP_SERVICES`.
pub fn resolver(catalog: &Value) -> CredentialResolver {
    CredentialResolver::from_vcap(Some(&catalog.to_string()))
}

/// Probe state whose every request gets a clone of `fake`.
pub fn fake_state(
    catalog: &Value,
    service_name: &str,
    display_name: &'static str,
    canary: Canary,
    fake: &FakeBackend,
) -> ProbeState<FakeBackend> {
    let probe = Probe::new(service_name, canary, resolver(catalog));
    let fake = fake.clone();
    ProbeState::new(probe, display_name, move || fake.clone())
}

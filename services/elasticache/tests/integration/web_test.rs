use axum::http::StatusCode;
use axum_test::TestServer;

use probe_core::fake::FakeBackend;
use probe_core::handler::probe_router;
use probe_core::probe::Canary;
use probe_elasticache::{CANARY_KEY, CANARY_VALUE, SERVICE_DISPLAY_NAME};
use probe_testing::fixture::{ELASTICACHE_SERVICE_NAME, elasticache_catalog, fake_state};

fn server(fake: &FakeBackend, service_name: &str) -> TestServer {
    let state = fake_state(
        &elasticache_catalog(),
        service_name,
        SERVICE_DISPLAY_NAME,
        Canary::new(CANARY_KEY, CANARY_VALUE),
        fake,
    );
    TestServer::new(probe_router(state)).unwrap()
}

#[tokio::test]
async fn should_report_ok_for_bound_cache() {
    let fake = FakeBackend::new();
    let resp = server(&fake, ELASTICACHE_SERVICE_NAME).get("/").await;

    resp.assert_status_ok();
    resp.assert_text("Elasticache service is OK");

    let state = fake.snapshot();
    let binding = state.binding.unwrap();
    assert_eq!(binding.host, "redis_host");
    assert_eq!(binding.port, Some(6379));
    assert_eq!(binding.password, "redis_password");
    assert!(state.store.is_empty(), "canary key should be deleted");
    assert_eq!(state.closes, 1);
}

#[tokio::test]
async fn should_report_424_when_value_not_retrieved() {
    let fake = FakeBackend::new().corrupt_reads("stale");
    let resp = server(&fake, ELASTICACHE_SERVICE_NAME).get("/").await;

    resp.assert_status(StatusCode::FAILED_DEPENDENCY);
    let body = resp.text();
    assert!(
        body.starts_with("Failed to access Elasticache: value set but not retrieved"),
        "{body}"
    );
    assert!(fake.snapshot().store.is_empty());
}

#[tokio::test]
async fn should_report_424_when_cache_unreachable() {
    let fake = FakeBackend::new().fail_connect("connect to redis_host:6379: Connection refused");
    let resp = server(&fake, ELASTICACHE_SERVICE_NAME).get("/").await;

    resp.assert_status(StatusCode::FAILED_DEPENDENCY);
    resp.assert_text(
        "Failed to access Elasticache: connection failed: connect to redis_host:6379: Connection refused",
    );
    assert_eq!(fake.snapshot().writes, 0);
}

#[tokio::test]
async fn should_report_424_for_unbound_service() {
    let fake = FakeBackend::new();
    let resp = server(&fake, "not-bound").get("/").await;

    resp.assert_status(StatusCode::FAILED_DEPENDENCY);
    resp.assert_text(r#"Failed to access Elasticache: no service binding named "not-bound""#);
    assert_eq!(fake.snapshot().connects, 0);
}

#[tokio::test]
async fn should_stay_ok_when_delete_fails() {
    let fake = FakeBackend::new().fail_cleanup("DEL: READONLY");
    let resp = server(&fake, ELASTICACHE_SERVICE_NAME).get("/").await;
    resp.assert_status_ok();
}

#[tokio::test]
async fn should_run_probe_on_any_path() {
    let fake = FakeBackend::new();
    let server = server(&fake, ELASTICACHE_SERVICE_NAME);

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    resp.assert_text("Elasticache service is OK");

    let resp = server.post("/").await;
    resp.assert_status_ok();

    assert_eq!(fake.snapshot().connects, 2);
}

#[tokio::test]
async fn should_report_424_on_any_path_for_unknown_binding() {
    let fake = FakeBackend::new();
    let resp = server(&fake, "not-bound").get("/healthz").await;

    resp.assert_status(StatusCode::FAILED_DEPENDENCY);
    let body = resp.text();
    assert!(body.starts_with("Failed to access Elasticache:"), "{body}");
}

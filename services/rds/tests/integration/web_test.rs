use axum::http::StatusCode;
use axum_test::TestServer;

use probe_core::fake::FakeBackend;
use probe_core::handler::probe_router;
use probe_core::probe::Canary;
use probe_rds::{CANARY_NAME, SERVICE_DISPLAY_NAME};
use probe_testing::fixture::{
    RDS_SERVICE_NAME, fake_state, rds_catalog, rds_catalog_with_short_keys,
};
use serde_json::Value;

fn server(fake: &FakeBackend) -> TestServer {
    server_for(&rds_catalog(), fake)
}

fn server_for(catalog: &Value, fake: &FakeBackend) -> TestServer {
    let state = fake_state(
        catalog,
        RDS_SERVICE_NAME,
        SERVICE_DISPLAY_NAME,
        Canary::new("test_data", CANARY_NAME),
        fake,
    );
    TestServer::new(probe_router(state)).unwrap()
}

#[tokio::test]
async fn should_report_ok_for_bound_database() {
    let fake = FakeBackend::new();
    let resp = server(&fake).get("/").await;

    resp.assert_status_ok();
    resp.assert_text("RDS service is OK");

    let binding = fake.snapshot().binding.unwrap();
    assert_eq!(binding.host, "test_host");
    assert_eq!(binding.username, "test_user");
    assert_eq!(binding.password, "test_password");
    assert_eq!(binding.database, "test_db");
}

#[tokio::test]
async fn should_report_424_when_row_differs() {
    let fake = FakeBackend::new().corrupt_reads("Barney");
    let resp = server(&fake).get("/").await;

    resp.assert_status(StatusCode::FAILED_DEPENDENCY);
    resp.assert_text(
        r#"Failed to access RDS: value set but not retrieved: expected "Fred", got "Barney""#,
    );
}

#[tokio::test]
async fn should_report_424_when_table_cannot_be_created() {
    let fake = FakeBackend::new().fail_write("create canary table: permission denied");
    let resp = server(&fake).get("/").await;

    resp.assert_status(StatusCode::FAILED_DEPENDENCY);
    resp.assert_text(
        "Failed to access RDS: write failed: create canary table: permission denied",
    );
    let state = fake.snapshot();
    assert_eq!(state.reads, 0);
    assert_eq!(state.closes, 1);
}

#[tokio::test]
async fn should_report_424_when_query_fails() {
    let fake = FakeBackend::new().fail_read("query test_data: relation does not exist");
    let resp = server(&fake).get("/").await;

    resp.assert_status(StatusCode::FAILED_DEPENDENCY);
    let body = resp.text();
    assert!(body.starts_with("Failed to access RDS: read failed:"), "{body}");
}

#[tokio::test]
async fn should_accept_user_and_name_keys() {
    let fake = FakeBackend::new();
    let resp = server_for(&rds_catalog_with_short_keys(), &fake)
        .get("/")
        .await;

    resp.assert_status_ok();
    resp.assert_text("RDS service is OK");

    let binding = fake.snapshot().binding.unwrap();
    assert_eq!(binding.host, "test_host");
    assert_eq!(binding.username, "test_user");
    assert_eq!(binding.password, "test_password");
    assert_eq!(binding.database, "test_db");
}

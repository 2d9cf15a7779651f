use tracing::info;

use probe_core::handler::probe_router;
use probe_core::tracing::init_tracing;
use probe_rds::config::RdsConfig;
use probe_rds::state::build_state;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = RdsConfig::from_env();
    let router = probe_router(build_state(&config));

    let addr = config.platform.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        service = %config.service_name,
        table = %config.table_name,
        "rds probe listening on {addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}

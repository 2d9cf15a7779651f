use tracing::info;

use probe_core::handler::probe_router;
use probe_core::tracing::init_tracing;
use probe_rmq::config::RmqConfig;
use probe_rmq::state::build_state;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = RmqConfig::from_env();
    let router = probe_router(build_state(&config));

    let addr = config.platform.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(
        service = %config.service_name,
        queue = %config.queue_name,
        receive_timeout_secs = config.receive_timeout.as_secs(),
        "rmq probe listening on {addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}

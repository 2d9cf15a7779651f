use tracing::info;

use probe_core::handler::probe_router;
use probe_core::tracing::init_tracing;
use probe_elasticache::config::ElasticacheConfig;
use probe_elasticache::state::build_state;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ElasticacheConfig::from_env();
    let router = probe_router(build_state(&config));

    let addr = config.platform.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(service = %config.service_name, "elasticache probe listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}

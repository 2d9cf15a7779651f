use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower_http::trace::TraceLayer;

use crate::backend::Backend;
use crate::error::ProbeFailure;
use crate::middleware::{propagate_request_id_layer, request_id_layer};
use crate::probe::Probe;

type BackendFactory<B> = dyn Fn() -> B + Send + Sync;

/// Shared state for the probe endpoint.
///
/// The factory is called once per request, so every probe run owns its own
/// backend session.
pub struct ProbeState<B> {
    pub probe: Arc<Probe>,
    /// Display name used in response bodies, e.g. `"Elasticache"`.
    pub service: &'static str,
    factory: Arc<BackendFactory<B>>,
}

impl<B> Clone for ProbeState<B> {
    fn clone(&self) -> Self {
        Self {
            probe: Arc::clone(&self.probe),
            service: self.service,
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<B: Backend> ProbeState<B> {
    pub fn new<F>(probe: Probe, service: &'static str, factory: F) -> Self
    where
        F: Fn() -> B + Send + Sync + 'static,
    {
        Self {
            probe: Arc::new(probe),
            service,
            factory: Arc::new(factory),
        }
    }

    pub fn backend(&self) -> B {
        (self.factory)()
    }
}

/// Run the probe and report 200 or 424.
pub async fn probe_handler<B: Backend + 'static>(State(state): State<ProbeState<B>>) -> Response {
    let mut backend = state.backend();
    match state.probe.run(&mut backend).await {
        Ok(()) => (StatusCode::OK, format!("{} service is OK", state.service)).into_response(),
        Err(error) => ProbeFailure {
            service: state.service,
            error,
        }
        .into_response(),
    }
}

/// Every path and method runs the probe; there is no routing.
pub fn probe_router<B: Backend + 'static>(state: ProbeState<B>) -> Router {
    Router::new()
        .fallback(probe_handler::<B>)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::probe::ProbeError;

/// A failed probe, rendered as `424 Failed Dependency`.
#[derive(Debug)]
pub struct ProbeFailure {
    /// Display name of the probed service, e.g. `"RDS"`.
    pub service: &'static str,
    pub error: ProbeError,
}

impl ProbeFailure {
    pub fn message(&self) -> String {
        format!("Failed to access {}: {}", self.service, self.error)
    }
}

impl IntoResponse for ProbeFailure {
    fn into_response(self) -> Response {
        // The probe already logged the failing stage; this records what the caller saw.
        tracing::warn!(
            service = self.service,
            kind = self.error.kind(),
            status = StatusCode::FAILED_DEPENDENCY.as_u16(),
            "dependency check failed"
        );
        (StatusCode::FAILED_DEPENDENCY, self.message()).into_response()
    }
}

use std::future::Future;
use std::time::Duration;

use crate::binding::ServiceBinding;

/// Failure reported by a backend client.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("not connected")]
    NotConnected,
    #[error("no value found for {0:?}")]
    NotFound(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("invalid binding: {0}")]
    InvalidBinding(String),
    /// Client library failure; rendered with its full context chain.
    #[error("{0:#}")]
    Client(#[from] anyhow::Error),
}

/// Operation-oriented view of a backing service used by the probe.
///
/// A value implementing this trait owns at most one session. `close` must be
/// idempotent and safe to call after a failed or partial `connect`.
pub trait Backend: Send {
    /// Open a session using the resolved credentials.
    fn connect(
        &mut self,
        binding: &ServiceBinding,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Store the canary value under `key`.
    fn write(
        &mut self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Read back the value stored under `key`.
    fn read(&mut self, key: &str) -> impl Future<Output = Result<String, BackendError>> + Send;

    /// Best-effort removal of whatever `write` created.
    fn cleanup(&mut self, key: &str) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Release the session.
    fn close(&mut self) -> impl Future<Output = ()> + Send;
}

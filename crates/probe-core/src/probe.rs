use std::fmt;

use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendError};
use crate::binding::{BindingError, CredentialResolver, ServiceBinding};

/// The record a probe writes and expects to read back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canary {
    pub key: String,
    pub value: String,
}

impl Canary {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Progress of a single probe run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStage {
    Idle,
    CredentialsResolved,
    Connected,
    Written,
    Verified,
    Done,
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::CredentialsResolved => "credentials_resolved",
            Self::Connected => "connected",
            Self::Written => "written",
            Self::Verified => "verified",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Why a probe run failed.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("{0}")]
    Credentials(#[from] BindingError),
    #[error("connection failed: {0}")]
    Connection(#[source] BackendError),
    #[error("write failed: {0}")]
    Write(#[source] BackendError),
    #[error("read failed: {0}")]
    Read(#[source] BackendError),
    #[error("value set but not retrieved: expected {expected:?}, got {actual:?}")]
    Mismatch { expected: String, actual: String },
}

impl ProbeError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Credentials(_) => "CREDENTIAL_ERROR",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Write(_) => "WRITE_ERROR",
            Self::Read(_) => "READ_ERROR",
            Self::Mismatch { .. } => "VERIFICATION_ERROR",
        }
    }

    /// The stage the probe was trying to reach when it failed.
    pub fn failed_at(&self) -> ProbeStage {
        match self {
            Self::Credentials(_) => ProbeStage::CredentialsResolved,
            Self::Connection(_) => ProbeStage::Connected,
            Self::Write(_) => ProbeStage::Written,
            Self::Read(_) | Self::Mismatch { .. } => ProbeStage::Verified,
        }
    }
}

pub type ProbeResult = Result<(), ProbeError>;

/// Round-trip health check against one bound service.
///
/// Built once at start-up; [`Probe::run`] is called per request with a fresh
/// backend.
#[derive(Debug, Clone)]
pub struct Probe {
    service_name: String,
    canary: Canary,
    resolver: CredentialResolver,
}

impl Probe {
    pub fn new(service_name: impl Into<String>, canary: Canary, resolver: CredentialResolver) -> Self {
        Self {
            service_name: service_name.into(),
            canary,
            resolver,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn canary(&self) -> &Canary {
        &self.canary
    }

    /// Resolve credentials, then connect, write, verify and clean up.
    ///
    /// Once `connect` has been attempted, `close` is called exactly once
    /// before returning, whatever the outcome.
    pub async fn run<B: Backend>(&self, backend: &mut B) -> ProbeResult {
        let binding = self.resolver.resolve(&self.service_name)?;
        debug!(
            service = %self.service_name,
            stage = %ProbeStage::CredentialsResolved,
            label = %binding.label,
            "credentials resolved"
        );

        let outcome = self.exercise(backend, &binding).await;
        backend.close().await;

        match &outcome {
            Ok(()) => info!(service = %self.service_name, stage = %ProbeStage::Done, "probe succeeded"),
            Err(e) => warn!(
                service = %self.service_name,
                stage = %e.failed_at(),
                kind = e.kind(),
                error = %e,
                "probe failed"
            ),
        }
        outcome
    }

    async fn exercise<B: Backend>(&self, backend: &mut B, binding: &ServiceBinding) -> ProbeResult {
        let Canary { key, value } = &self.canary;

        backend.connect(binding).await.map_err(ProbeError::Connection)?;
        debug!(service = %self.service_name, stage = %ProbeStage::Connected);

        backend.write(key, value).await.map_err(ProbeError::Write)?;
        debug!(service = %self.service_name, stage = %ProbeStage::Written, key = %key);

        // The canary exists from here on, so cleanup runs whether or not
        // verification passes.
        let verified = verify(backend, key, value).await;
        if verified.is_ok() {
            debug!(service = %self.service_name, stage = %ProbeStage::Verified);
        }

        if let Err(e) = backend.cleanup(key).await {
            warn!(service = %self.service_name, key = %key, error = %e, "canary cleanup failed");
        }
        verified
    }
}

async fn verify<B: Backend>(backend: &mut B, key: &str, expected: &str) -> ProbeResult {
    let actual = backend.read(key).await.map_err(ProbeError::Read)?;
    if actual != expected {
        return Err(ProbeError::Mismatch {
            expected: expected.to_owned(),
            actual,
        });
    }
    Ok(())
}

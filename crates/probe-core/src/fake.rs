//! In-memory [`Backend`] used to exercise the probe without a live service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::anyhow;

use crate::backend::{Backend, BackendError};
use crate::binding::ServiceBinding;

/// Everything the fake has observed. Shared between clones.
#[derive(Debug, Clone, Default)]
pub struct FakeState {
    pub binding: Option<ServiceBinding>,
    pub store: HashMap<String, String>,
    pub connected: bool,
    pub connects: usize,
    pub writes: usize,
    pub reads: usize,
    pub cleanups: usize,
    pub closes: usize,
}

#[derive(Debug, Clone, Default)]
struct Failures {
    connect: Option<String>,
    write: Option<String>,
    read: Option<String>,
    cleanup: Option<String>,
    corrupt_reads: Option<String>,
}

/// Fake backend with injectable failures.
///
/// Clones share the same [`FakeState`], so a test can keep one handle while
/// the probe router builds a fresh clone per request.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<FakeState>>,
    failures: Failures,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_connect(mut self, message: &str) -> Self {
        self.failures.connect = Some(message.to_owned());
        self
    }

    pub fn fail_write(mut self, message: &str) -> Self {
        self.failures.write = Some(message.to_owned());
        self
    }

    pub fn fail_read(mut self, message: &str) -> Self {
        self.failures.read = Some(message.to_owned());
        self
    }

    pub fn fail_cleanup(mut self, message: &str) -> Self {
        self.failures.cleanup = Some(message.to_owned());
        self
    }

    /// Make every successful read return `value` instead of what was stored.
    pub fn corrupt_reads(mut self, value: &str) -> Self {
        self.failures.corrupt_reads = Some(value.to_owned());
        self
    }

    /// Copy of the shared state for assertions.
    pub fn snapshot(&self) -> FakeState {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn injected(message: &Option<String>) -> Result<(), BackendError> {
        match message {
            Some(message) => Err(BackendError::Client(anyhow!(message.clone()))),
            None => Ok(()),
        }
    }
}

impl Backend for FakeBackend {
    async fn connect(&mut self, binding: &ServiceBinding) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.connects += 1;
        state.binding = Some(binding.clone());
        Self::injected(&self.failures.connect)?;
        state.connected = true;
        Ok(())
    }

    async fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        if !state.connected {
            return Err(BackendError::NotConnected);
        }
        state.writes += 1;
        Self::injected(&self.failures.write)?;
        state.store.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn read(&mut self, key: &str) -> Result<String, BackendError> {
        let mut state = self.lock();
        if !state.connected {
            return Err(BackendError::NotConnected);
        }
        state.reads += 1;
        Self::injected(&self.failures.read)?;
        let stored = state
            .store
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(key.to_owned()))?;
        Ok(self.failures.corrupt_reads.clone().unwrap_or(stored))
    }

    async fn cleanup(&mut self, key: &str) -> Result<(), BackendError> {
        let mut state = self.lock();
        state.cleanups += 1;
        Self::injected(&self.failures.cleanup)?;
        state.store.remove(key);
        Ok(())
    }

    async fn close(&mut self) {
        let mut state = self.lock();
        state.closes += 1;
        state.connected = false;
    }
}

use anyhow::Context as _;
use deadpool_redis::redis::{self, AsyncCommands, Client, aio::MultiplexedConnection};
use tracing::debug;
use url::Url;

use probe_core::backend::{Backend, BackendError};
use probe_core::binding::ServiceBinding;

/// Port assumed when the binding does not carry one.
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// `host:port` of the bound cache.
pub fn address(binding: &ServiceBinding) -> String {
    format!(
        "{}:{}",
        binding.host,
        binding.port.unwrap_or(DEFAULT_REDIS_PORT)
    )
}

/// Connection URL for database 0, with the password percent-encoded.
pub fn redis_url(binding: &ServiceBinding) -> Result<Url, BackendError> {
    if binding.host.is_empty() {
        return Err(BackendError::InvalidBinding("missing host".to_owned()));
    }
    let mut url = Url::parse(&format!("redis://{}/0", address(binding)))
        .map_err(|e| BackendError::InvalidBinding(format!("bad address {}: {e}", address(binding))))?;
    if !binding.password.is_empty() {
        url.set_password(Some(&binding.password))
            .map_err(|()| BackendError::InvalidBinding("cannot encode password".to_owned()))?;
    }
    Ok(url)
}

/// Single-connection Redis client: `PING` on connect, `SET`/`GET`/`DEL` for
/// the canary.
#[derive(Default)]
pub struct RedisBackend {
    conn: Option<MultiplexedConnection>,
}

impl RedisBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    fn conn(&mut self) -> Result<&mut MultiplexedConnection, BackendError> {
        self.conn.as_mut().ok_or(BackendError::NotConnected)
    }
}

impl Backend for RedisBackend {
    async fn connect(&mut self, binding: &ServiceBinding) -> Result<(), BackendError> {
        let url = redis_url(binding)?;
        let addr = address(binding);
        let client = Client::open(url.as_str()).context("invalid redis url")?;
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .with_context(|| format!("connect to {addr}"))?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("PING")?;
        debug!(addr = %addr, "redis connected");
        self.conn = Some(conn);
        Ok(())
    }

    async fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        let conn = self.conn()?;
        let (): () = conn.set(key, value).await.context("SET")?;
        Ok(())
    }

    async fn read(&mut self, key: &str) -> Result<String, BackendError> {
        let conn = self.conn()?;
        let value: Option<String> = conn.get(key).await.context("GET")?;
        value.ok_or_else(|| BackendError::NotFound(key.to_owned()))
    }

    async fn cleanup(&mut self, key: &str) -> Result<(), BackendError> {
        let conn = self.conn()?;
        let _: i64 = conn.del(key).await.context("DEL")?;
        Ok(())
    }

    async fn close(&mut self) {
        // Dropping the multiplexed handle shuts down its driver task.
        self.conn = None;
    }
}

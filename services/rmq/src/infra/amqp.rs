use std::pin::pin;
use std::time::Duration;

use anyhow::{Context as _, anyhow};
use futures::{Stream, StreamExt, stream};
use lapin::options::{BasicGetOptions, BasicPublishOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};
use tracing::{debug, warn};
use url::Url;

use probe_core::backend::{Backend, BackendError};
use probe_core::binding::ServiceBinding;

/// Upper bound on waiting for the published message to come back.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause between `basic.get` attempts on an empty queue.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

const CLOSE_REPLY_CODE: u16 = 200;

/// Broker URI for the binding; `ssl` upgrades a plain `amqp://` URI to
/// `amqps://`.
pub fn amqp_uri(binding: &ServiceBinding) -> Result<String, BackendError> {
    if binding.uri.is_empty() {
        return Err(BackendError::InvalidBinding("missing uri".to_owned()));
    }
    match binding.uri.strip_prefix("amqp://") {
        Some(rest) if binding.ssl => Ok(format!("amqps://{rest}")),
        _ => Ok(binding.uri.clone()),
    }
}

/// URI with the password masked, for logs and error messages.
pub fn redact(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable uri>".to_owned(),
    }
}

/// Message bodies fetched from `queue` one `basic.get` at a time, with
/// auto-ack. An empty queue is retried after [`POLL_INTERVAL`].
fn poll_queue<'a>(
    channel: &'a Channel,
    queue: &'a str,
) -> impl Stream<Item = Result<Vec<u8>, lapin::Error>> + Send + 'a {
    stream::unfold((), move |()| async move {
        loop {
            match channel
                .basic_get(queue, BasicGetOptions { no_ack: true })
                .await
            {
                Ok(Some(message)) => return Some((Ok(message.delivery.data), ())),
                Ok(None) => tokio::time::sleep(POLL_INTERVAL).await,
                Err(e) => return Some((Err(e), ())),
            }
        }
    })
}

/// First message body from `messages`, waiting at most `wait`.
pub async fn receive_one<S>(messages: S, wait: Duration) -> Result<String, BackendError>
where
    S: Stream<Item = Result<Vec<u8>, lapin::Error>>,
{
    let mut messages = pin!(messages);
    let data = tokio::time::timeout(wait, messages.next())
        .await
        .map_err(|_| BackendError::Timeout(wait))?
        .ok_or_else(|| anyhow!("message stream ended"))?
        .context("receive")?;
    let body = String::from_utf8(data).context("message body is not UTF-8")?;
    Ok(body)
}

/// AMQP 0-9-1 backend: declares one queue, publishes the canary to it via
/// the default exchange and fetches it back with `basic.get`.
pub struct RmqBackend {
    queue: String,
    receive_timeout: Duration,
    conn: Option<Connection>,
    channel: Option<Channel>,
}

impl RmqBackend {
    pub fn new(queue: impl Into<String>, receive_timeout: Duration) -> Self {
        Self {
            queue: queue.into(),
            receive_timeout,
            conn: None,
            channel: None,
        }
    }

    pub fn queue(&self) -> &str {
        &self.queue
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    fn channel(&self) -> Result<&Channel, BackendError> {
        self.channel.as_ref().ok_or(BackendError::NotConnected)
    }
}

impl Backend for RmqBackend {
    async fn connect(&mut self, binding: &ServiceBinding) -> Result<(), BackendError> {
        let uri = amqp_uri(binding)?;
        let conn = Connection::connect(&uri, ConnectionProperties::default())
            .await
            .with_context(|| format!("dial {}", redact(&uri)))?;
        let channel = conn.create_channel().await;
        // Keep the connection even if the channel fails so close() can release it.
        self.conn = Some(conn);
        let channel = channel.context("open channel")?;

        let declared = channel
            .queue_declare(
                &self.queue,
                QueueDeclareOptions::default(),
                FieldTable::default(),
            )
            .await;
        self.channel = Some(channel);
        declared.with_context(|| format!("declare queue {}", self.queue))?;
        debug!(uri = %redact(&uri), queue = %self.queue, "amqp connected");
        Ok(())
    }

    async fn write(&mut self, key: &str, value: &str) -> Result<(), BackendError> {
        let channel = self.channel()?;
        channel
            .basic_publish(
                "",
                key,
                BasicPublishOptions::default(),
                value.as_bytes(),
                BasicProperties::default().with_content_type("text/plain".into()),
            )
            .await
            .context("publish")?
            .await
            .context("publish confirm")?;
        Ok(())
    }

    async fn read(&mut self, key: &str) -> Result<String, BackendError> {
        let receive_timeout = self.receive_timeout;
        let channel = self.channel()?;
        receive_one(poll_queue(channel, key), receive_timeout)
            .await
            .map_err(|e| match e {
                BackendError::Client(e) => {
                    BackendError::Client(e.context(format!("get from {key}")))
                }
                other => other,
            })
    }

    async fn cleanup(&mut self, _key: &str) -> Result<(), BackendError> {
        // basic.get with auto-ack already removed the message.
        Ok(())
    }

    async fn close(&mut self) {
        if let Some(channel) = self.channel.take() {
            if let Err(e) = channel.close(CLOSE_REPLY_CODE, "probe complete").await {
                warn!(error = %e, "failed to close amqp channel");
            }
        }
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close(CLOSE_REPLY_CODE, "probe complete").await {
                warn!(error = %e, "failed to close amqp connection");
            }
        }
    }
}

//! Event publisher: turns an upload notification into one queue message.
//!
//! The message is boilerplate plus a timestamp. Fields of the triggering
//! event are logged but not forwarded.

use chrono::{DateTime, Local};
use serde_json::Value;

use crate::error::Result;
use crate::services::MessageBroker;

/// Exchange used for direct-to-queue publishing.
pub const DEFAULT_EXCHANGE: &str = "";

/// Body returned to the invoker on success.
pub const LAMBDA_GREETING: &str = "Hello from Lambda!";

/// Publishes single messages, one broker session per call.
pub struct Publisher<B> {
    broker: B,
}

impl<B: MessageBroker> Publisher<B> {
    pub fn new(broker: B) -> Self {
        Self { broker }
    }

    /// Publish `body` to `queue` through the default exchange.
    ///
    /// Opens a fresh session and closes it before returning. A publish error
    /// takes precedence over a close error.
    pub async fn publish(&self, queue: &str, body: &[u8]) -> Result<()> {
        let mut session = self.broker.open().await?;
        let published = session.publish(DEFAULT_EXCHANGE, queue, body).await;
        let closed = session.close().await;
        published.and(closed)?;

        log::debug!("Published {} bytes to queue {}", body.len(), queue);
        Ok(())
    }
}

/// Message body for an upload notification received at `now`.
pub fn upload_message(now: DateTime<Local>) -> String {
    format!("Hello World! It is {}", now.format("%Y-%m-%d %H:%M:%S%.6f"))
}

/// `bucket/key` of every S3 record in a notification event.
pub fn uploaded_objects(event: &Value) -> Vec<String> {
    event
        .get("Records")
        .and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .filter_map(|record| {
                    let s3 = record.get("s3")?;
                    let bucket = s3.get("bucket")?.get("name")?.as_str()?;
                    let key = s3.get("object")?.get("key")?.as_str()?;
                    Some(format!("{bucket}/{key}"))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Lambda proxy-style response for a successful publish.
pub fn success_response() -> Result<Value> {
    Ok(serde_json::json!({
        "statusCode": 200,
        "body": serde_json::to_string(LAMBDA_GREETING)?,
    }))
}

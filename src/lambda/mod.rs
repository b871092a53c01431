// src/lambda/mod.rs

//! AWS Lambda handler for the upload publisher.
//!
//! Triggered by S3 object-created notifications. Each invocation opens a
//! fresh broker connection, publishes one greeting to the configured
//! queue and closes the connection again.

use chrono::Local;
use lambda_runtime::{Error as LambdaError, LambdaEvent};
use serde_json::Value;
use tracing::{error, info, instrument};

use crate::models::Config;
use crate::services::MessageBroker;
use crate::services::publisher::{self, Publisher};

/// Main Lambda handler function.
///
/// A broker failure fails the invocation so the platform can retry it.
#[instrument(skip_all, fields(request_id = %event.context.request_id))]
pub async fn handler<B: MessageBroker>(
    publisher: &Publisher<B>,
    config: &Config,
    event: LambdaEvent<Value>,
) -> Result<Value, LambdaError> {
    let (payload, _context) = event.into_parts();

    info!(
        "Connecting to RabbitMQ at {}",
        config.broker.address()
    );
    info!(
        "Received event: {}",
        serde_json::to_string_pretty(&payload)?
    );
    for object in publisher::uploaded_objects(&payload) {
        info!("Uploaded object: {}", object);
    }

    let message = publisher::upload_message(Local::now());
    if let Err(e) = publisher
        .publish(&config.broker.queue, message.as_bytes())
        .await
    {
        error!("Publishing to {} failed: {}", config.broker.queue, e);
        return Err(e.into());
    }
    info!("Sent '{}' to queue {}", message, config.broker.queue);

    Ok(publisher::success_response()?)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use lambda_runtime::Context;
    use serde_json::json;

    use super::*;
    use crate::error::{AppError, Result};
    use crate::services::BrokerSession;

    #[derive(Clone, Default)]
    struct FakeBroker {
        sent: Arc<Mutex<Vec<(String, String)>>>,
        down: bool,
    }

    struct FakeSession {
        sent: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl MessageBroker for FakeBroker {
        async fn open(&self) -> Result<Box<dyn BrokerSession>> {
            if self.down {
                return Err(AppError::config("connection refused"));
            }
            Ok(Box::new(FakeSession {
                sent: self.sent.clone(),
            }))
        }
    }

    #[async_trait]
    impl BrokerSession for FakeSession {
        async fn publish(&mut self, _exchange: &str, routing_key: &str, body: &[u8]) -> Result<()> {
            self.sent.lock().unwrap().push((
                routing_key.to_string(),
                String::from_utf8_lossy(body).into_owned(),
            ));
            Ok(())
        }

        async fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    fn s3_event() -> LambdaEvent<Value> {
        let payload = json!({
            "Records": [{
                "s3": { "bucket": { "name": "vetube" }, "object": { "key": "cat.mp4" } }
            }]
        });
        LambdaEvent::new(payload, Context::default())
    }

    #[tokio::test]
    async fn publishes_greeting_and_returns_success() {
        let broker = FakeBroker::default();
        let sent = broker.sent.clone();
        let publisher = Publisher::new(broker);

        let response = handler(&publisher, &Config::default(), s3_event())
            .await
            .unwrap();

        assert_eq!(response["statusCode"], 200);
        assert_eq!(response["body"], "\"Hello from Lambda!\"");
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "hello");
        assert!(sent[0].1.starts_with("Hello World! It is "));
    }

    #[tokio::test]
    async fn broker_failure_fails_invocation() {
        let publisher = Publisher::new(FakeBroker {
            down: true,
            ..FakeBroker::default()
        });

        let result = handler(&publisher, &Config::default(), s3_event()).await;

        assert!(result.is_err());
    }
}

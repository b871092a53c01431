//! Message broker sessions.
//!
//! A [`MessageBroker`] hands out short-lived sessions: each one owns its own
//! connection and channel and is closed by the caller when done. Nothing is
//! pooled or shared between sessions.

use async_trait::async_trait;
use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties};

use crate::error::Result;
use crate::models::BrokerConfig;

/// Reply code sent when closing a channel or connection normally.
const REPLY_SUCCESS: u16 = 200;

/// Opens independent broker sessions.
#[async_trait]
pub trait MessageBroker: Send + Sync {
    /// Open a new connection and channel.
    async fn open(&self) -> Result<Box<dyn BrokerSession>>;
}

/// One open connection + channel.
#[async_trait]
pub trait BrokerSession: Send {
    /// Publish `body` without waiting for a delivery confirmation.
    async fn publish(&mut self, exchange: &str, routing_key: &str, body: &[u8]) -> Result<()>;

    /// Close the channel and the connection.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// RabbitMQ over AMQP 0-9-1.
#[derive(Debug, Clone)]
pub struct AmqpBroker {
    uri: String,
}

impl AmqpBroker {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn from_config(config: &BrokerConfig) -> Result<Self> {
        Ok(Self::new(config.amqp_uri()?))
    }
}

#[async_trait]
impl MessageBroker for AmqpBroker {
    async fn open(&self) -> Result<Box<dyn BrokerSession>> {
        let connection = Connection::connect(&self.uri, ConnectionProperties::default()).await?;
        let channel = connection.create_channel().await?;
        Ok(Box::new(AmqpSession {
            connection,
            channel,
        }))
    }
}

struct AmqpSession {
    connection: Connection,
    channel: Channel,
}

#[async_trait]
impl BrokerSession for AmqpSession {
    async fn publish(&mut self, exchange: &str, routing_key: &str, body: &[u8]) -> Result<()> {
        // The returned confirm is dropped: the channel is not in confirm mode.
        let _confirm = self
            .channel
            .basic_publish(
                exchange,
                routing_key,
                BasicPublishOptions::default(),
                body,
                BasicProperties::default(),
            )
            .await?;
        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.channel.close(REPLY_SUCCESS, "OK").await?;
        self.connection.close(REPLY_SUCCESS, "OK").await?;
        Ok(())
    }
}

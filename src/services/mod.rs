//! Service layer for the dev tooling.
//!
//! This module contains the pieces the binaries wire together:
//! - Readiness probing (`wait_until_ready`, `HttpProbe`, `BrokerProbe`)
//! - Broker sessions and the upload publisher (`AmqpBroker`, `Publisher`)
//! - Cloud administration against LocalStack (`CloudAdmin`, `LocalStackAdmin`)
//! - The video-processing consumer (`consume`)

mod broker;
mod cloud;
pub mod consumer;
mod localstack;
pub mod publisher;
mod readiness;

pub use broker::{AmqpBroker, BrokerSession, MessageBroker};
pub use cloud::CloudAdmin;
pub use consumer::{ConsumerSettings, Delivery, DeliveryAck, consume, handle_deliveries};
pub use localstack::LocalStackAdmin;
pub use publisher::Publisher;
pub use readiness::{BrokerProbe, HttpProbe, Probe, Ready, RetryPolicy, wait_for, wait_until_ready};

//! AWS Lambda entry point for the upload publisher
//!
//! Build for the `provided.al2023` runtime and deploy the binary as
//! `bootstrap`.

use lambda_runtime::{Error as LambdaError, service_fn};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vetube::{
    config, lambda,
    services::{AmqpBroker, Publisher},
};

#[tokio::main]
async fn main() -> Result<(), LambdaError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = config::load_for_lambda()?;
    let publisher = Publisher::new(AmqpBroker::from_config(&config.broker)?);

    info!("VeTube upload publisher starting...");
    lambda_runtime::run(service_fn(|event| {
        lambda::handler(&publisher, &config, event)
    }))
    .await
}

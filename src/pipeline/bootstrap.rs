// src/pipeline/bootstrap.rs

//! Local environment bootstrap: wait for every dependency, then provision.

use std::time::Duration;

use crate::error::Result;
use crate::models::Config;
use crate::services::{
    AmqpBroker, BrokerProbe, CloudAdmin, HttpProbe, LocalStackAdmin, Probe, wait_for,
};
use crate::utils::http;

use super::provision::{ProvisionReport, run_provision};

/// Probes for RabbitMQ then LocalStack, in the order they are awaited.
pub fn default_probes(config: &Config) -> Result<Vec<Box<dyn Probe>>> {
    let broker = AmqpBroker::from_config(&config.broker)?;
    let client = http::create_async_client(Duration::from_secs(
        config.readiness.http_timeout_secs,
    ))?;

    let rabbitmq: Box<dyn Probe> = Box::new(BrokerProbe::new("RabbitMQ", broker));
    let localstack: Box<dyn Probe> =
        Box::new(HttpProbe::new("LocalStack", client, &config.localstack.url));
    Ok(vec![rabbitmq, localstack])
}

/// Wait for each probe in turn; the first one to time out aborts the rest.
pub async fn run_wait(probes: &[Box<dyn Probe>], config: &Config) -> Result<()> {
    let policy = config.readiness.policy();
    for probe in probes {
        wait_for(probe.as_ref(), &policy).await?;
    }
    Ok(())
}

/// Wait for all dependencies, then run every provisioning step.
pub async fn run_bootstrap(
    probes: &[Box<dyn Probe>],
    admin: &dyn CloudAdmin,
    config: &Config,
) -> Result<ProvisionReport> {
    run_wait(probes, config).await?;
    let report = run_provision(admin, config).await?;
    log::info!("Local dev environment is ready to be used!");
    Ok(report)
}

/// Bootstrap against the real RabbitMQ and LocalStack endpoints.
pub async fn run_local_bootstrap(config: &Config) -> Result<ProvisionReport> {
    log::info!("Using LocalStack at {}", config.localstack.url);
    let probes = default_probes(config)?;
    let admin = LocalStackAdmin::connect(&config.localstack).await;
    run_bootstrap(&probes, &admin, config).await
}

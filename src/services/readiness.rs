//! Fixed-interval readiness probing.
//!
//! A dependency is polled until a check passes or the attempt budget is
//! spent. There is no backoff and no jitter: every retry waits the same
//! delay.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::services::MessageBroker;

/// Attempt budget and delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(5))
    }
}

/// Successful probe outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ready {
    /// Number of calls to the check, including the successful one
    pub attempts: u32,
}

/// Poll `check` until it returns `Ok(true)`.
///
/// `Ok(false)` and `Err(_)` both count as a failed attempt. After
/// `policy.max_attempts` failures this returns [`AppError::NotReady`]; the
/// check is never called more often than that. No sleep follows the final
/// failed attempt.
pub async fn wait_until_ready<F, Fut>(
    service: &str,
    policy: &RetryPolicy,
    mut check: F,
) -> Result<Ready>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    log::info!("Waiting for {} to be ready...", service);

    for attempt in 1..=policy.max_attempts {
        match check().await {
            Ok(true) => {
                log::info!("{} is ready!", service);
                return Ok(Ready { attempts: attempt });
            }
            Ok(false) => log::debug!("{} check returned not ready", service),
            Err(e) => log::debug!("{} check failed: {}", service, e),
        }

        if attempt < policy.max_attempts {
            log::info!(
                "{} is not ready yet (attempt {} of {}). Retrying in {}s...",
                service,
                attempt,
                policy.max_attempts,
                policy.delay.as_secs()
            );
            tokio::time::sleep(policy.delay).await;
        }
    }

    log::error!("{} is not ready. Aborting...", service);
    Err(AppError::not_ready(service, policy.max_attempts))
}

/// An external dependency that can be polled for readiness.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Display name used in logs and errors.
    fn name(&self) -> &str;

    /// One readiness check.
    async fn check(&self) -> Result<bool>;
}

/// Poll a [`Probe`] under `policy`.
pub async fn wait_for(probe: &dyn Probe, policy: &RetryPolicy) -> Result<Ready> {
    wait_until_ready(probe.name(), policy, || probe.check()).await
}

/// Ready when `GET url` answers with a 2xx status.
pub struct HttpProbe {
    name: String,
    client: reqwest::Client,
    url: String,
}

impl HttpProbe {
    pub fn new(name: impl Into<String>, client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Probe for HttpProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<bool> {
        let response = self.client.get(&self.url).send().await?;
        Ok(response.status().is_success())
    }
}

/// Ready when a broker session can be opened and closed.
pub struct BrokerProbe<B> {
    name: String,
    broker: B,
}

impl<B: MessageBroker> BrokerProbe<B> {
    pub fn new(name: impl Into<String>, broker: B) -> Self {
        Self {
            name: name.into(),
            broker,
        }
    }
}

#[async_trait]
impl<B: MessageBroker> Probe for BrokerProbe<B> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<bool> {
        let session = self.broker.open().await?;
        session.close().await?;
        Ok(true)
    }
}

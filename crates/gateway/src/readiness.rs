//! Startup barrier: wait until every collaborator reports healthy.
//!
//! The gateway must not serve before its upstreams answer their health
//! endpoints. [`wait_until_ready`] sleeps for a grace period, then probes all
//! collaborators each round until they pass together or attempts run out.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use configs::ReadinessConfig;
use futures::future::join_all;
use reqwest::{Client, StatusCode, Url};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ReadinessPolicy {
    grace: Duration,
    interval: Duration,
    max_attempts: u32,
}

impl ReadinessPolicy {
    pub fn new(grace: Duration, interval: Duration, max_attempts: u32) -> Self {
        Self { grace, interval, max_attempts: max_attempts.max(1) }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

impl From<&ReadinessConfig> for ReadinessPolicy {
    fn from(cfg: &ReadinessConfig) -> Self {
        Self::new(cfg.grace(), cfg.interval(), cfg.max_attempts)
    }
}

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("upstreams not ready after {attempts} attempts: {}", .pending.join(", "))]
    Exhausted { attempts: u32, pending: Vec<String> },
}

#[async_trait]
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> &str;
    /// `Err` carries a human-readable reason.
    async fn check(&self) -> Result<(), String>;
}

/// Healthy only on a 200 from `GET url`.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    name: String,
    http: Client,
    url: Url,
}

impl HttpHealthProbe {
    pub fn new(name: impl Into<String>, http: Client, url: Url) -> Self {
        Self { name: name.into(), http, url }
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<(), String> {
        let resp = self.http.get(self.url.clone()).send().await.map_err(|e| e.to_string())?;
        match resp.status() {
            StatusCode::OK => Ok(()),
            other => Err(format!("status {other}")),
        }
    }
}

/// Returns the number of rounds it took for every probe to pass.
pub async fn wait_until_ready(
    policy: &ReadinessPolicy,
    probes: &[Arc<dyn HealthProbe>],
) -> Result<u32, ReadinessError> {
    debug!(grace = ?policy.grace, "readiness grace period");
    sleep(policy.grace).await;

    let mut pending = Vec::new();
    for attempt in 1..=policy.max_attempts {
        let results = join_all(probes.iter().map(|p| p.check())).await;
        pending.clear();
        for (probe, result) in probes.iter().zip(results) {
            if let Err(reason) = result {
                info!(event = "readiness_attempt", attempt, upstream = probe.name(), %reason, "upstream not ready");
                pending.push(probe.name().to_string());
            }
        }
        if pending.is_empty() {
            info!(event = "ready", attempt, "all upstreams healthy");
            return Ok(attempt);
        }
        if attempt < policy.max_attempts {
            sleep(policy.interval).await;
        }
    }

    warn!(event = "readiness_exhausted", attempts = policy.max_attempts, ?pending, "giving up on upstreams");
    Err(ReadinessError::Exhausted { attempts: policy.max_attempts, pending })
}

use std::time::Duration;

use reqwest::Client;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use moor_core::swallow;

use crate::{error::HeartbeatError, record::HeartbeatRecord};

/// Default time between sends.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Default per-send request deadline.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// Collector endpoint, POSTed one record per tick.
    pub url: String,
    pub interval: Duration,
    /// Per-send request deadline, independent of the interval timer.
    pub send_timeout: Duration,
    /// Bearer credential attached only when configured.
    pub auth_token: Option<String>,
    pub license_jwt: Option<String>,
}

impl HeartbeatConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            interval: DEFAULT_INTERVAL,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            auth_token: None,
            license_jwt: None,
        }
    }
}

/// Periodic fail-open compliance ping.
///
/// [`HeartbeatClient::start`] fires one send immediately, then one per
/// interval. Every failure (non-success status, network error, timeout)
/// is absorbed by the shared boundary and logged; the timer never stops
/// on error. The loop runs on a detached task, so it cannot keep the
/// process alive once the runtime shuts down.
pub struct HeartbeatClient {
    config: HeartbeatConfig,
    http: Client,
}

impl HeartbeatClient {
    pub fn new(config: HeartbeatConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Spawn the send loop and return its stop handle.
    pub fn start(self) -> HeartbeatHandle {
        let token = CancellationToken::new();
        let guard = token.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.config.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately: one send up front,
            // then one per interval.
            loop {
                tokio::select! {
                    _ = guard.cancelled() => {
                        debug!("heartbeat loop stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        swallow("heartbeat", self.send()).await;
                    }
                }
            }
        });

        HeartbeatHandle { token }
    }

    async fn send(&self) -> Result<(), HeartbeatError> {
        let record = HeartbeatRecord::collect(self.config.license_jwt.as_deref());

        let mut req = self
            .http
            .post(&self.config.url)
            .timeout(self.config.send_timeout)
            .json(&record);
        if let Some(token) = &self.config.auth_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(HeartbeatError::Status(resp.status().as_u16()));
        }
        debug!(url = %self.config.url, "heartbeat sent");
        Ok(())
    }
}

/// Stops the send loop. `stop` is idempotent; dropping the handle without
/// calling it leaves the loop running for the life of the runtime.
pub struct HeartbeatHandle {
    token: CancellationToken,
}

impl HeartbeatHandle {
    pub fn stop(&self) {
        self.token.cancel();
    }
}

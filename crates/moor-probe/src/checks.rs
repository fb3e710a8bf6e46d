use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::Client;
use serde::Serialize;

use moor_kv::KvStore;

const METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of one dependency check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl CheckResult {
    pub(crate) fn passed() -> Self {
        Self {
            ok: true,
            latency_ms: None,
            warning: None,
        }
    }

    pub(crate) fn passed_in(elapsed: Duration) -> Self {
        Self {
            ok: true,
            latency_ms: Some(elapsed.as_millis() as u64),
            warning: None,
        }
    }

    pub(crate) fn failed(warning: impl Into<String>) -> Self {
        Self {
            ok: false,
            latency_ms: None,
            warning: Some(warning.into()),
        }
    }
}

/// KV backend reachability. Vacuously ok when no external store is
/// configured (the in-process fallback has nothing to probe).
pub(crate) async fn check_kv(kv: Option<Arc<dyn KvStore>>) -> CheckResult {
    let Some(kv) = kv else {
        return CheckResult::passed();
    };
    let started = Instant::now();
    match kv.ping().await {
        Ok(()) => CheckResult::passed_in(started.elapsed()),
        Err(e) => CheckResult::failed(format!("kv_unreachable: {e}")),
    }
}

/// Metadata-store reachability: a HEAD with its own 5s timeout. Any
/// response below 500 counts as reachable.
pub(crate) async fn check_metadata_store(http: &Client, url: &str) -> CheckResult {
    if url.is_empty() {
        return CheckResult::failed("metadata_store_not_configured");
    }
    let started = Instant::now();
    match http.head(url).timeout(METADATA_TIMEOUT).send().await {
        Ok(resp) if resp.status().as_u16() < 500 => CheckResult::passed_in(started.elapsed()),
        Ok(resp) => CheckResult::failed(format!(
            "metadata_store_status_{}",
            resp.status().as_u16()
        )),
        Err(e) => CheckResult::failed(format!("metadata_store_unreachable: {e}")),
    }
}

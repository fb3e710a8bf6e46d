use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use reqwest::Client;
use tracing::info;

use moor_kv::KvStore;

use crate::{
    checks::{CheckResult, check_kv, check_metadata_store},
    license::check_license,
};

/// Probe targets, set once by the bootstrap before traffic arrives.
#[derive(Clone, Default)]
pub struct ProbeConfig {
    /// Metadata store to HEAD on every readiness request.
    pub metadata_store_url: String,
    /// External KV backend; `None` means the in-process fallback is in
    /// use and the KV check passes vacuously.
    pub kv: Option<Arc<dyn KvStore>>,
    /// License credential; `None` means an unlicensed deployment.
    pub license_jwt: Option<String>,
}

/// Process-wide probe state.
///
/// Owns the two lifecycle flags. Both transition false -> true exactly
/// once, together, via [`ProbeState::mark_ready`]; nothing reverses them.
pub struct ProbeState {
    ready: AtomicBool,
    startup_complete: AtomicBool,
    targets: RwLock<ProbeConfig>,
    http: Client,
}

impl ProbeState {
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(false),
            startup_complete: AtomicBool::new(false),
            targets: RwLock::new(ProbeConfig::default()),
            http: Client::new(),
        }
    }

    pub fn configure(&self, config: ProbeConfig) {
        let mut targets = self.targets.write().unwrap();
        *targets = config;
    }

    /// Flip `ready` and `startup_complete` together. Idempotent.
    pub fn mark_ready(&self) {
        let was_ready = self.ready.swap(true, Ordering::SeqCst);
        self.startup_complete.store(true, Ordering::SeqCst);
        if !was_ready {
            info!("probe state marked ready");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn is_startup_complete(&self) -> bool {
        self.startup_complete.load(Ordering::SeqCst)
    }

    /// Run the three readiness checks concurrently, fresh per call.
    ///
    /// Each check carries its own timeout, so one slow dependency cannot
    /// delay the others past its own bound.
    pub(crate) async fn run_checks(&self) -> (CheckResult, CheckResult, CheckResult) {
        // Clone out of the lock; checks must not hold it across awaits.
        let ProbeConfig {
            metadata_store_url,
            kv,
            license_jwt,
        } = self.targets.read().unwrap().clone();

        tokio::join!(
            check_kv(kv),
            check_metadata_store(&self.http, &metadata_store_url),
            async move { check_license(license_jwt.as_deref()) },
        )
    }
}

impl Default for ProbeState {
    fn default() -> Self {
        Self::new()
    }
}

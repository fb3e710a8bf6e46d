use std::{
    fmt::Display,
    sync::Mutex,
    time::Duration,
};

use tokio::task::JoinSet;
use tracing::{debug, warn};

use moor_core::swallow;

/// Default deadline for [`ExecutionContext::drain`].
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Tracks fire-and-forget work for one unit of work (one request or one
/// scheduled tick) and joins it with a deadline.
///
/// Built for call sites written against a hosted platform's execution
/// context: `wait_until` registers work that outlives the response,
/// `drain` is the bounded join the host calls before recycling the
/// context. One instance per unit of work; discard it afterwards.
pub struct ExecutionContext {
    tasks: Mutex<JoinSet<()>>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self {
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Register background work to run independently of the caller.
    ///
    /// The task's failure is caught and logged here and never propagates:
    /// a rejecting task cannot crash the process or surface to the
    /// request path.
    pub fn wait_until<F, E>(&self, task: F)
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let mut tasks = self.tasks.lock().unwrap();
        tasks.spawn(swallow("wait_until", task));
    }

    /// Interface-parity no-op.
    ///
    /// The platform being emulated uses this to fall back to origin
    /// forwarding on exception; there is no origin here.
    pub fn pass_through_on_exception(&self) {}

    /// Number of tasks still registered. Mostly useful for callers that
    /// want to log before draining.
    pub fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    /// Wait for all registered tasks to settle, racing `timeout`.
    ///
    /// On deadline the still-pending tasks are detached, not aborted:
    /// they keep running to completion, observed only by the internal
    /// catch handler. Either way the registered set ends empty, so a
    /// second `drain` returns immediately.
    pub async fn drain(&self, timeout: Duration) {
        let mut tasks = {
            let mut guard = self.tasks.lock().unwrap();
            std::mem::take(&mut *guard)
        };
        if tasks.is_empty() {
            return;
        }

        debug!(count = tasks.len(), "draining background tasks");
        let joined = tokio::time::timeout(timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res
                    && e.is_panic()
                {
                    warn!(error = %e, "background task panicked");
                }
            }
        })
        .await;

        if joined.is_err() {
            warn!(
                pending = tasks.len(),
                timeout_ms = timeout.as_millis() as u64,
                "drain deadline elapsed, abandoning pending tasks"
            );
            // Abandoned tasks keep running; dropping the set must not
            // abort them.
            tasks.detach_all();
        }
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new()
    }
}

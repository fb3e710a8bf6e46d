use std::fmt::Display;

use tracing::warn;

/// Run a fallible operation and absorb its failure.
///
/// This is the single error boundary for fire-and-forget work: background
/// tasks and heartbeat sends go through here so the "never propagate"
/// contract lives in one place. A failure is logged at warn level and
/// dropped.
pub async fn swallow<F, E>(context: &'static str, fut: F)
where
    F: Future<Output = Result<(), E>>,
    E: Display,
{
    if let Err(e) = fut.await {
        warn!(context, error = %e, "operation failed, suppressed at boundary");
    }
}

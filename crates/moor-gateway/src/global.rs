use std::sync::{
    OnceLock,
    atomic::{AtomicBool, Ordering},
};

use reqwest::{Request, Response};
use tracing::{debug, info};

use crate::client::GatewayClient;

static INSTALLED: AtomicBool = AtomicBool::new(false);
static CLIENT: OnceLock<GatewayClient> = OnceLock::new();

/// Install the process-wide interceptor. Idempotent: the shared client is
/// wrapped at most once, a second call only logs.
pub fn install() {
    if INSTALLED.swap(true, Ordering::SeqCst) {
        debug!("gateway interceptor already installed");
        return;
    }
    CLIENT.get_or_init(GatewayClient::new);
    info!("gateway interceptor installed");
}

/// Disable the rewrite.
///
/// Known limitation: this only clears the guard flag. The wrapped client
/// is never torn down and a later [`install`] re-enables it rather than
/// wrapping again; tests that need a truly clean slate should use an
/// injected [`GatewayClient`] instead.
pub fn uninstall() {
    INSTALLED.store(false, Ordering::SeqCst);
    debug!("gateway interceptor uninstalled (flag only)");
}

pub fn is_installed() -> bool {
    INSTALLED.load(Ordering::SeqCst)
}

/// How many times the shared client has been wrapped. Stays at 1 no
/// matter how often [`install`] is called.
pub fn wrap_count() -> usize {
    CLIENT.get().map_or(0, |_| 1)
}

/// Process-wide fetch. Applies the rewrite only while installed;
/// otherwise delegates unchanged, matching the pre-install behavior of
/// the platform being emulated.
pub async fn fetch(req: Request) -> reqwest::Result<Response> {
    let client = CLIENT.get_or_init(GatewayClient::new);
    if is_installed() {
        client.fetch(req).await
    } else {
        client.fetch_raw(req).await
    }
}

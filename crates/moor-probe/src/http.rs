use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{checks::CheckResult, state::ProbeState};

/// Build the health router.
///
/// Routes:
/// - GET /health/live - process is serving HTTP, probes nothing
/// - GET /health/ready - fitness to receive traffic
/// - GET /health/startup - initialization finished
pub fn router(state: Arc<ProbeState>) -> Router {
    Router::new()
        .route("/health/live", get(live))
        .route("/health/ready", get(ready))
        .route("/health/startup", get(startup))
        .with_state(state)
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
struct LiveResponse {
    status: &'static str,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ReadyResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    checks: Option<ReadyChecks>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct ReadyChecks {
    kv: CheckResult,
    metadata_store: CheckResult,
    license: CheckResult,
}

#[derive(Debug, Serialize)]
struct StartupResponse {
    status: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health/live
async fn live() -> impl IntoResponse {
    Json(LiveResponse {
        status: "ok",
        timestamp: timestamp(),
    })
}

/// GET /health/ready
///
/// Results are computed fresh on every request, never cached.
async fn ready(State(state): State<Arc<ProbeState>>) -> impl IntoResponse {
    if !state.is_ready() {
        let body = ReadyResponse {
            status: "not_ready",
            checks: None,
            timestamp: timestamp(),
        };
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body));
    }

    let (kv, metadata_store, license) = state.run_checks().await;
    let all_ok = kv.ok && metadata_store.ok && license.ok;

    let body = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" },
        checks: Some(ReadyChecks {
            kv,
            metadata_store,
            license,
        }),
        timestamp: timestamp(),
    };
    let code = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(body))
}

/// GET /health/startup
async fn startup(State(state): State<Arc<ProbeState>>) -> impl IntoResponse {
    if state.is_startup_complete() {
        (StatusCode::OK, Json(StartupResponse { status: "ok" }))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(StartupResponse { status: "starting" }),
        )
    }
}

fn timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use tower::ServiceExt;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::method,
    };

    use crate::state::ProbeConfig;

    async fn get_json(
        router: Router,
        path: &str,
    ) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn live_is_always_ok() {
        let state = Arc::new(ProbeState::new());
        let (status, body) = get_json(router(state), "/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn ready_is_503_before_mark_ready() {
        let state = Arc::new(ProbeState::new());
        let (status, body) = get_json(router(state), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "not_ready");
    }

    #[tokio::test]
    async fn ready_is_ok_with_healthy_dependencies() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let state = Arc::new(ProbeState::new());
        state.configure(ProbeConfig {
            metadata_store_url: server.uri(),
            kv: None,
            license_jwt: None,
        });
        state.mark_ready();

        let (status, body) = get_json(router(state), "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["checks"]["kv"]["ok"], true);
        assert_eq!(body["checks"]["metadata_store"]["ok"], true);
        assert_eq!(body["checks"]["license"]["ok"], true);
    }

    #[tokio::test]
    async fn failing_metadata_store_degrades_readiness() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let state = Arc::new(ProbeState::new());
        state.configure(ProbeConfig {
            metadata_store_url: server.uri(),
            kv: None,
            license_jwt: None,
        });
        state.mark_ready();

        let (status, body) = get_json(router(state), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"]["metadata_store"]["ok"], false);
        assert_eq!(body["checks"]["kv"]["ok"], true);
    }

    #[tokio::test]
    async fn startup_transitions_with_mark_ready() {
        let state = Arc::new(ProbeState::new());

        let (status, body) = get_json(router(Arc::clone(&state)), "/health/startup").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "starting");

        state.mark_ready();
        let (status, body) = get_json(router(state), "/health/startup").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}

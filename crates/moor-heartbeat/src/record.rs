use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use moor_core::{deployment_id, memory_usage_mb, platform, runtime_version, uptime_seconds};

/// One telemetry ping, constructed fresh per send and never persisted.
#[derive(Debug, Serialize)]
pub struct HeartbeatRecord {
    pub deployment_id: String,
    /// Serialized as `null` for unlicensed deployments.
    pub license_jwt: Option<String>,
    pub version: &'static str,
    pub heartbeat_data: HeartbeatData,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct HeartbeatData {
    pub uptime_seconds: u64,
    pub health_status: &'static str,
    /// Wire field name kept for compatibility with the hosted collector;
    /// carries the runtime identifier.
    pub node_version: String,
    pub platform: &'static str,
    pub memory_usage_mb: u64,
}

impl HeartbeatRecord {
    pub fn collect(license_jwt: Option<&str>) -> Self {
        Self {
            deployment_id: deployment_id().to_string(),
            license_jwt: license_jwt.map(str::to_string),
            version: env!("CARGO_PKG_VERSION"),
            heartbeat_data: HeartbeatData {
                uptime_seconds: uptime_seconds(),
                health_status: "healthy",
                node_version: runtime_version(),
                platform: platform(),
                memory_usage_mb: memory_usage_mb(),
            },
            timestamp: OffsetDateTime::now_utc()
                .format(&Rfc3339)
                .unwrap_or_default(),
        }
    }
}

use std::{fs, path::Path, sync::OnceLock, time::Instant};

static DEPLOYMENT_ID: OnceLock<String> = OnceLock::new();
static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Initialize process start time.
///
/// Called once by the bootstrap; later calls are no-ops.
pub fn init_uptime() {
    START_TIME.get_or_init(Instant::now);
}

/// Get process uptime in seconds.
pub fn uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(Instant::now);
    start.elapsed().as_secs()
}

/// Get platform (OS family).
#[inline]
pub fn platform() -> &'static str {
    std::env::consts::OS
}

/// Get architecture.
#[inline]
pub fn arch() -> &'static str {
    std::env::consts::ARCH
}

/// Get runtime identifier reported in telemetry payloads.
pub fn runtime_version() -> String {
    format!("rust/{}-{}", env!("CARGO_PKG_VERSION"), arch())
}

/// Get or generate the stable deployment ID for this process.
///
/// Preference order: kubernetes pod hostname, container ID from the
/// cgroup hierarchy, random v4 UUID.
pub fn deployment_id() -> &'static str {
    DEPLOYMENT_ID.get_or_init(|| {
        if is_kubernetes()
            && let Ok(hostname) = hostname::get()
            && let Some(name) = hostname.to_str()
        {
            return name.to_string();
        }
        if let Some(container_id) = container_id() {
            return container_id;
        }
        uuid::Uuid::new_v4().to_string()
    })
}

/// Resident set size in megabytes (Linux only, best effort).
///
/// Reads `VmRSS` from `/proc/self/status`; returns 0 when unavailable.
pub fn memory_usage_mb() -> u64 {
    #[cfg(target_os = "linux")]
    {
        if let Ok(content) = fs::read_to_string("/proc/self/status") {
            for line in content.lines() {
                if let Some(rest) = line.strip_prefix("VmRSS:") {
                    let kb: u64 = rest
                        .trim()
                        .trim_end_matches("kB")
                        .trim()
                        .parse()
                        .unwrap_or(0);
                    return kb / 1024;
                }
            }
        }
    }
    0
}

fn is_kubernetes() -> bool {
    std::env::var("KUBERNETES_SERVICE_HOST").is_ok()
        || Path::new("/var/run/secrets/kubernetes.io/serviceaccount").exists()
}

fn container_id() -> Option<String> {
    let cgroup = fs::read_to_string("/proc/self/cgroup").ok()?;

    for line in cgroup.lines() {
        if let Some(docker_part) = line.split('/').find(|s| s.starts_with("docker-")) {
            let id = docker_part
                .trim_start_matches("docker-")
                .trim_end_matches(".scope");
            if !id.is_empty() {
                return Some(id.to_string());
            }
        }
        if let Some(id) = line
            .split("/docker/")
            .nth(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            return Some(id.to_owned());
        }
    }
    None
}

mod boundary;
pub use boundary::swallow;

mod system;
pub use system::{
    arch, deployment_id, init_uptime, memory_usage_mb, platform, runtime_version, uptime_seconds,
};

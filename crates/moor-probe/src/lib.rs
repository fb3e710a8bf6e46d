mod checks;
pub use checks::CheckResult;

mod license;

mod state;
pub use state::{ProbeConfig, ProbeState};

mod http;
pub use http::router;

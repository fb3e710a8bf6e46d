mod context;
pub use context::{DEFAULT_DRAIN_TIMEOUT, ExecutionContext};

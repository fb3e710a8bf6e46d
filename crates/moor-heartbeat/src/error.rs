use thiserror::Error;

#[derive(Debug, Error)]
pub enum HeartbeatError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("non-success response: {0}")]
    Status(u16),
}

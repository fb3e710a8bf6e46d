use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("backend error: {0}")]
    Backend(#[from] redis::RedisError),
    #[error("invalid store url: {0}")]
    InvalidUrl(String),
}

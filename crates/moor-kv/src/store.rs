use async_trait::async_trait;

use crate::error::KvError;

/// Write options for [`KvStore::put`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PutOptions {
    /// Relative time-to-live in seconds, converted to an absolute expiry
    /// at write time. `None` means the entry never expires.
    pub expiration_ttl: Option<u64>,
}

impl PutOptions {
    pub fn ttl(seconds: u64) -> Self {
        Self {
            expiration_ttl: Some(seconds),
        }
    }
}

/// Minimal durable key-value contract.
///
/// `get` on a missing or expired key is `Ok(None)`, never an error.
/// Backend connectivity failures propagate to the caller as [`KvError`];
/// the store performs no retries of its own.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    async fn put(&self, key: &str, value: &str, opts: PutOptions) -> Result<(), KvError>;

    /// Delete a key. Deleting a key that does not exist is not an error.
    async fn delete(&self, key: &str) -> Result<(), KvError>;

    /// Lightweight liveness probe used by the readiness check.
    async fn ping(&self) -> Result<(), KvError>;
}

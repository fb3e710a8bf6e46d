use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
    time::{Duration, Instant},
};

use async_trait::async_trait;

use crate::{
    error::KvError,
    store::{KvStore, PutOptions},
};

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-process fallback store.
///
/// Used when no external store is configured. Same contract as the real
/// backend, but data is process-local and lost on restart. Expiry is lazy:
/// an entry past its deadline is never returned by `get`, whether or not
/// it has been physically removed yet.
#[derive(Clone, Default)]
pub struct MemoryKv {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    fn write_entry(&self, key: &str, value: &str, expires_at: Option<Instant>) {
        let mut entries = self.entries.write().unwrap();
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let entries = self.entries.read().unwrap();
        let value = entries
            .get(key)
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.value.clone());
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, opts: PutOptions) -> Result<(), KvError> {
        let expires_at = opts
            .expiration_ttl
            .map(|secs| Instant::now() + Duration::from_secs(secs));
        self.write_entry(key, value, expires_at);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut entries = self.entries.write().unwrap();
        entries.remove(key);
        Ok(())
    }

    async fn ping(&self) -> Result<(), KvError> {
        Ok(())
    }
}

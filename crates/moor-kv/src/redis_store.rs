use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use tracing::debug;

use crate::{
    error::KvError,
    store::{KvStore, PutOptions},
};

/// Redis-backed store.
///
/// Holds one multiplexed connection manager; each call clones the handle,
/// so concurrent callers share the backing connection without cross-call
/// locks or affinity. Reconnects are handled inside the manager; command
/// failures still propagate to the caller unretried.
#[derive(Clone)]
pub struct RedisKv {
    conn: ConnectionManager,
}

impl RedisKv {
    pub async fn connect(url: &str) -> Result<Self, KvError> {
        let client =
            redis::Client::open(url).map_err(|e| KvError::InvalidUrl(e.to_string()))?;
        let conn = ConnectionManager::new(client).await?;
        debug!(url, "connected to kv backend");
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisKv {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: &str, opts: PutOptions) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        match opts.expiration_ttl {
            // SET with EX gives the backend the absolute deadline; reads
            // past it return nil even before eviction runs.
            Some(seconds) => conn.set_ex::<_, _, ()>(key, value, seconds).await?,
            None => conn.set::<_, _, ()>(key, value).await?,
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<()>(&mut conn).await?;
        Ok(())
    }
}

mod error;
pub use error::KvError;

mod store;
pub use store::{KvStore, PutOptions};

mod memory;
pub use memory::MemoryKv;

mod redis_store;
pub use redis_store::RedisKv;

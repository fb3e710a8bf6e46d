mod error;
pub use error::HeartbeatError;

mod record;
pub use record::{HeartbeatData, HeartbeatRecord};

mod client;
pub use client::{
    DEFAULT_INTERVAL, DEFAULT_SEND_TIMEOUT, HeartbeatClient, HeartbeatConfig, HeartbeatHandle,
};

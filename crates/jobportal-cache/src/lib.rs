//! # JobPortal Cache
//!
//! Response caching infrastructure.
//!
//! A [`CacheStore`] is built once at startup and handed to the HTTP
//! middleware. It stores serialized response bodies under keys produced by
//! [`keys`], talks to Redis when configured, and falls back to an in-process
//! map whenever Redis is missing or failing. Write routes invalidate whole
//! [`CacheGroup`]s by key prefix.

mod backend;
pub mod groups;
pub mod keys;
mod memory;
mod redis_backend;
mod store;

pub use backend::CacheBackend;
pub use groups::CacheGroup;
pub use memory::InMemoryBackend;
pub use redis_backend::RedisBackend;
pub use store::{CacheStats, CacheStore, ReconnectPolicy, SessionStoreKind};

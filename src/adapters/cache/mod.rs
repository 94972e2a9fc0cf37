//! Rate cache backends.
//!
//! The in-memory backend suits tests and single-instance deployments; the
//! Redis backend keeps multiple instances coherent.

mod in_memory;
mod redis;

pub use in_memory::InMemoryRateCache;
pub use redis::RedisRateCache;

//! Redis-backed rate cache for multi-instance deployments.
//!
//! Entries are stored as JSON under `commission:rate:{category_id}` with a
//! TTL via `SET ... EX`. Invalidation is a `DEL` on the same key, so every
//! instance observes a rate mutation on its next lookup.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::commission::CommissionRate;
use crate::domain::foundation::{CategoryId, LedgerError};
use crate::ports::RateCache;

/// Redis rate cache.
#[derive(Clone)]
pub struct RedisRateCache {
    conn: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisRateCache {
    pub fn new(conn: MultiplexedConnection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    fn key(category_id: &CategoryId) -> String {
        format!("commission:rate:{}", category_id)
    }
}

#[async_trait]
impl RateCache for RedisRateCache {
    async fn get(&self, category_id: &CategoryId) -> Result<Option<CommissionRate>, LedgerError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(Self::key(category_id))
            .await
            .map_err(|e| LedgerError::Storage(format!("redis GET failed: {}", e)))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| LedgerError::Storage(format!("corrupt cached rate: {}", e))),
            None => Ok(None),
        }
    }

    async fn put(&self, rate: &CommissionRate) -> Result<(), LedgerError> {
        let json = serde_json::to_string(rate)
            .map_err(|e| LedgerError::Storage(format!("failed to serialize rate: {}", e)))?;
        let mut conn = self.conn.clone();
        conn.set_ex(Self::key(&rate.category_id), json, self.ttl_secs)
            .await
            .map_err(|e| LedgerError::Storage(format!("redis SET failed: {}", e)))
    }

    async fn invalidate(&self, category_id: &CategoryId) -> Result<(), LedgerError> {
        let mut conn = self.conn.clone();
        conn.del(Self::key(category_id))
            .await
            .map_err(|e| LedgerError::Storage(format!("redis DEL failed: {}", e)))
    }
}

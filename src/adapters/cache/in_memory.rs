//! In-memory rate cache for testing and single-instance deployments.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::commission::CommissionRate;
use crate::domain::foundation::{CategoryId, LedgerError};
use crate::ports::RateCache;

/// Default entry lifetime.
const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Entry {
    rate: CommissionRate,
    inserted_at: Instant,
}

/// In-process TTL cache of active rates, keyed by category.
pub struct InMemoryRateCache {
    entries: Arc<RwLock<HashMap<CategoryId, Entry>>>,
    ttl: Duration,
}

impl InMemoryRateCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait]
impl RateCache for InMemoryRateCache {
    async fn get(&self, category_id: &CategoryId) -> Result<Option<CommissionRate>, LedgerError> {
        let entries = self.entries.read().await;
        match entries.get(category_id) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                Ok(Some(entry.rate.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn put(&self, rate: &CommissionRate) -> Result<(), LedgerError> {
        self.entries.write().await.insert(
            rate.category_id,
            Entry {
                rate: rate.clone(),
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn invalidate(&self, category_id: &CategoryId) -> Result<(), LedgerError> {
        self.entries.write().await.remove(category_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commission::CommissionType;
    use rust_decimal_macros::dec;

    fn rate() -> CommissionRate {
        CommissionRate::new(
            CategoryId::new(),
            CommissionType::Percentage,
            dec!(0.08),
            None,
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn put_then_get_returns_rate() {
        let cache = InMemoryRateCache::with_default_ttl();
        let rate = rate();
        cache.put(&rate).await.unwrap();
        let cached = cache.get(&rate.category_id).await.unwrap();
        assert_eq!(cached.map(|r| r.id), Some(rate.id));
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss() {
        let cache = InMemoryRateCache::new(Duration::from_millis(10));
        let rate = rate();
        cache.put(&rate).await.unwrap();
        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(cache.get(&rate.category_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn invalidate_removes_entry() {
        let cache = InMemoryRateCache::with_default_ttl();
        let rate = rate();
        cache.put(&rate).await.unwrap();
        cache.invalidate(&rate.category_id).await.unwrap();
        assert!(cache.get(&rate.category_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn get_on_unknown_category_is_a_miss() {
        let cache = InMemoryRateCache::with_default_ttl();
        assert!(cache.get(&CategoryId::new()).await.unwrap().is_none());
    }
}

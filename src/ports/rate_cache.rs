//! RateCache port - Injectable cache in front of rate resolution.
//!
//! Rate lookups sit on the order-completion hot path. The cache is an
//! explicit, injectable interface rather than ambient global state: an
//! in-process map for single-instance deployments, Redis for multi-instance.
//! Invalidation is keyed by category, performed by every rate mutation.

use async_trait::async_trait;

use crate::domain::commission::CommissionRate;
use crate::domain::foundation::{CategoryId, LedgerError};

/// Port for caching active commission rates by category.
///
/// Cache failures must degrade to a miss, never fail the resolution.
#[async_trait]
pub trait RateCache: Send + Sync {
    async fn get(&self, category_id: &CategoryId) -> Result<Option<CommissionRate>, LedgerError>;

    async fn put(&self, rate: &CommissionRate) -> Result<(), LedgerError>;

    /// Drops the cached rate for one category.
    async fn invalidate(&self, category_id: &CategoryId) -> Result<(), LedgerError>;
}

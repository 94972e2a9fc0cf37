//! RateResolver - Active-rate lookup with a cache in front.

use std::sync::Arc;

use crate::domain::commission::CommissionRate;
use crate::domain::foundation::{CategoryId, LedgerError};
use crate::ports::{RateCache, RateRepository};

/// Resolves the active commission rate for a category.
///
/// Cache failures degrade to a repository lookup; they never fail the
/// resolution itself.
pub struct RateResolver {
    repository: Arc<dyn RateRepository>,
    cache: Arc<dyn RateCache>,
}

impl RateResolver {
    pub fn new(repository: Arc<dyn RateRepository>, cache: Arc<dyn RateCache>) -> Self {
        Self { repository, cache }
    }

    /// Resolves the active rate for the category.
    ///
    /// Fails with `NotFound` when no active rate exists; the caller decides
    /// between a platform default and rejecting the order.
    pub async fn resolve(&self, category_id: &CategoryId) -> Result<CommissionRate, LedgerError> {
        match self.cache.get(category_id).await {
            Ok(Some(rate)) => return Ok(rate),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(category_id = %category_id, error = %e, "rate cache read failed")
            }
        }

        let rate = self
            .repository
            .find_active_by_category(category_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("commission rate", category_id))?;

        if let Err(e) = self.cache.put(&rate).await {
            tracing::warn!(category_id = %category_id, error = %e, "rate cache write failed");
        }
        Ok(rate)
    }
}

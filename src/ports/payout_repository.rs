//! PayoutRepository port - Payout batch storage.

use async_trait::async_trait;

use crate::domain::foundation::{LedgerError, PayoutId, StoreId};
use crate::domain::payout::CommissionPayout;

/// Port for payout batches.
///
/// Uniqueness of `(store_id, period)` rests on a datastore constraint, not
/// application locking: of two concurrent inserts for the same key, exactly
/// one succeeds and the other observes [`LedgerError::Conflict`].
#[async_trait]
pub trait PayoutRepository: Send + Sync {
    /// Inserts a payout. Fails with `Conflict` when a payout already exists
    /// for the store and period.
    async fn insert(&self, payout: &CommissionPayout) -> Result<(), LedgerError>;

    /// Persists the payout's current status and processing stamps.
    async fn update_status(&self, payout: &CommissionPayout) -> Result<(), LedgerError>;

    async fn find_by_id(&self, id: &PayoutId) -> Result<Option<CommissionPayout>, LedgerError>;

    /// Payouts for one store, newest period first.
    async fn list_by_store(&self, store_id: &StoreId)
        -> Result<Vec<CommissionPayout>, LedgerError>;
}

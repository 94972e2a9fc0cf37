//! RateRepository port - Commission rate storage.

use async_trait::async_trait;

use crate::domain::commission::CommissionRate;
use crate::domain::foundation::{CategoryId, LedgerError, RateId};

/// Port for storing and resolving commission rates.
///
/// Implementations must uphold the at-most-one-active-rate-per-category
/// invariant (a partial unique index in Postgres, a scan under lock in
/// memory) and surface violations as [`LedgerError::Conflict`].
#[async_trait]
pub trait RateRepository: Send + Sync {
    /// Inserts a rate. Fails with `Conflict` when an active rate already
    /// exists for the category.
    async fn insert(&self, rate: &CommissionRate) -> Result<(), LedgerError>;

    /// Replaces a rate's mutable fields. Fails with `Conflict` when the
    /// update would put two active rates on one category, and `NotFound`
    /// when the rate does not exist.
    async fn update(&self, rate: &CommissionRate) -> Result<(), LedgerError>;

    /// Deletes a rate. The caller must have checked for referencing
    /// transactions first. Fails with `NotFound` when absent.
    async fn delete(&self, id: &RateId) -> Result<(), LedgerError>;

    async fn find_by_id(&self, id: &RateId) -> Result<Option<CommissionRate>, LedgerError>;

    /// Resolves the single active rate for a category, if any.
    async fn find_active_by_category(
        &self,
        category_id: &CategoryId,
    ) -> Result<Option<CommissionRate>, LedgerError>;

    /// All rates, active and retired, for the operator CRUD surface.
    async fn list(&self) -> Result<Vec<CommissionRate>, LedgerError>;
}

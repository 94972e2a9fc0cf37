//! StoreRepository port - Seller subscription state.

use async_trait::async_trait;

use crate::domain::foundation::{LedgerError, StoreId};
use crate::domain::store::{Store, SubscriptionStatus};

/// Port for reading sellers and updating their subscription standing.
///
/// Store CRUD belongs to an external collaborator; the engine only needs
/// lookup and the webhook-driven status flips.
#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn find_by_id(&self, id: &StoreId) -> Result<Option<Store>, LedgerError>;

    /// Locates the store whose gateway subscription or customer id matches
    /// the reference carried by a payment.
    async fn find_by_gateway_reference(
        &self,
        reference: &str,
    ) -> Result<Option<Store>, LedgerError>;

    /// Updates a store's subscription status. Fails with `NotFound` when the
    /// store does not exist.
    async fn set_subscription_status(
        &self,
        id: &StoreId,
        status: SubscriptionStatus,
    ) -> Result<(), LedgerError>;
}

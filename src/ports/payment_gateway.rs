//! PaymentGateway port - Signature verification and payment lookup.

use async_trait::async_trait;

use crate::domain::foundation::LedgerError;
use crate::domain::gateway::GatewayPayment;

/// Port for the external payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Verifies the webhook signature against the raw, unparsed body.
    ///
    /// Must run before any JSON parsing so a mutated body can never reach
    /// the parser with a stale signature. Fails with
    /// [`LedgerError::Authentication`].
    fn verify_signature(&self, payload: &[u8], signature: &str) -> Result<(), LedgerError>;

    /// Fetches the gateway's view of a payment.
    ///
    /// Returns `Ok(None)` when the gateway does not know the payment.
    /// Transport failures and timeouts surface as [`LedgerError::Gateway`];
    /// both are safe to retry on redelivery.
    async fn find_payment(&self, payment_id: &str) -> Result<Option<GatewayPayment>, LedgerError>;
}

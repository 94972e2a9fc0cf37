//! Mock payment gateway for tests and local development.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::LedgerError;
use crate::domain::gateway::GatewayPayment;
use crate::ports::PaymentGateway;

use super::signature::{compute_signature, verify_signature};

const MOCK_SECRET: &[u8] = b"mock_webhook_secret";

/// In-memory gateway with seedable payments and fault injection.
#[derive(Default)]
pub struct MockPaymentGateway {
    payments: Mutex<HashMap<String, GatewayPayment>>,
    next_lookup_error: Mutex<Option<String>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `find_payment` return this payment by id.
    pub fn seed_payment(&self, payment: GatewayPayment) {
        self.payments
            .lock()
            .unwrap()
            .insert(payment.id.clone(), payment);
    }

    /// Makes the next lookup fail, simulating a timeout or outage.
    pub fn fail_next_lookup(&self, error: impl Into<String>) {
        *self.next_lookup_error.lock().unwrap() = Some(error.into());
    }

    /// Signs a payload the way the mock gateway would.
    pub fn sign(&self, payload: &[u8]) -> String {
        compute_signature(MOCK_SECRET, payload)
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    fn verify_signature(&self, payload: &[u8], signature: &str) -> Result<(), LedgerError> {
        verify_signature(MOCK_SECRET, payload, signature)
    }

    async fn find_payment(&self, payment_id: &str) -> Result<Option<GatewayPayment>, LedgerError> {
        if let Some(error) = self.next_lookup_error.lock().unwrap().take() {
            return Err(LedgerError::Gateway(error));
        }
        Ok(self.payments.lock().unwrap().get(payment_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::gateway::PaymentStatus;
    use rust_decimal_macros::dec;

    fn payment() -> GatewayPayment {
        GatewayPayment {
            id: "pay_1".to_string(),
            customer: "cus_1".to_string(),
            subscription: None,
            status: PaymentStatus::Confirmed,
            value: dec!(10.00),
        }
    }

    #[tokio::test]
    async fn seeded_payment_is_found() {
        let gateway = MockPaymentGateway::new();
        gateway.seed_payment(payment());
        assert!(gateway.find_payment("pay_1").await.unwrap().is_some());
        assert!(gateway.find_payment("pay_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn injected_failure_fires_once() {
        let gateway = MockPaymentGateway::new();
        gateway.seed_payment(payment());
        gateway.fail_next_lookup("boom");

        assert!(gateway.find_payment("pay_1").await.is_err());
        assert!(gateway.find_payment("pay_1").await.is_ok());
    }

    #[test]
    fn sign_produces_verifiable_signature() {
        let gateway = MockPaymentGateway::new();
        let signature = gateway.sign(b"body");
        assert!(gateway.verify_signature(b"body", &signature).is_ok());
        assert!(gateway.verify_signature(b"other", &signature).is_err());
    }
}

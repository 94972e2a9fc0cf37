//! IngestWebhookHandler - At-most-once processing of gateway notifications.
//!
//! The ordering here is load-bearing:
//! 1. signature verification against the raw body, before any parsing;
//! 2. parse into the tagged event union;
//! 3. insert the idempotency record; the unique key is the mutex, and a
//!    loser returns the stored outcome without re-running side effects;
//! 4. gateway lookup (bounded by the client timeout), then local effects,
//!    then the record is closed as completed or failed.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::foundation::LedgerError;
use crate::domain::gateway::{GatewayEvent, GatewayEventKind, GatewayPayment};
use crate::domain::store::SubscriptionStatus;
use crate::ports::{
    InsertOutcome, PaymentGateway, StoreRepository, WebhookEventRecord, WebhookEventRepository,
    WebhookEventStatus,
};

/// Raw webhook delivery as received by the HTTP adapter.
#[derive(Debug, Clone)]
pub struct IngestWebhookCommand {
    pub payload: Vec<u8>,
    /// Value of the signature header; `None` when no accepted header was
    /// present.
    pub signature: Option<String>,
}

/// What the delivery amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestOutcome {
    /// First delivery; side effects applied.
    Processed { idempotency_key: String },
    /// First delivery of an event the engine deliberately does not act on
    /// (unknown event name, payment matching no store).
    Ignored { idempotency_key: String, reason: String },
    /// Redelivery; the stored outcome is returned untouched.
    Duplicate {
        idempotency_key: String,
        status: WebhookEventStatus,
        error_message: Option<String>,
    },
}

/// Handler guarding webhook ingestion with the idempotency-key pattern.
pub struct IngestWebhookHandler {
    gateway: Arc<dyn PaymentGateway>,
    events: Arc<dyn WebhookEventRepository>,
    stores: Arc<dyn StoreRepository>,
}

impl IngestWebhookHandler {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        events: Arc<dyn WebhookEventRepository>,
        stores: Arc<dyn StoreRepository>,
    ) -> Self {
        Self {
            gateway,
            events,
            stores,
        }
    }

    pub async fn handle(&self, cmd: IngestWebhookCommand) -> Result<IngestOutcome, LedgerError> {
        // 1. Authenticate before parsing anything.
        let signature = cmd
            .signature
            .as_deref()
            .ok_or_else(|| LedgerError::Authentication("missing signature header".to_string()))?;
        self.gateway.verify_signature(&cmd.payload, signature)?;

        // 2. Parse into the tagged union.
        let event = GatewayEvent::parse(&cmd.payload, &Utc::now().to_rfc3339())?;

        // 3. Win or lose the idempotency race.
        let key = event.idempotency_key();
        let record =
            WebhookEventRecord::processing(&key, event.kind.as_str(), &event.payment_id);
        match self.events.insert_processing(record).await? {
            InsertOutcome::Inserted => {}
            InsertOutcome::AlreadyExists(stored) => {
                tracing::info!(
                    idempotency_key = %key,
                    event_type = %event.kind.as_str(),
                    stored_status = stored.status.as_str(),
                    "duplicate webhook delivery short-circuited"
                );
                return Ok(IngestOutcome::Duplicate {
                    idempotency_key: key,
                    status: stored.status,
                    error_message: stored.error_message,
                });
            }
        }

        // Unknown event names are acknowledged, not processed.
        if let GatewayEventKind::Unknown(name) = &event.kind {
            let reason = format!("ignored: unhandled event type '{}'", name);
            self.events.mark_completed(&key, Some(reason.clone())).await?;
            return Ok(IngestOutcome::Ignored {
                idempotency_key: key,
                reason,
            });
        }

        // 4. Side effects; any failure is captured on the record before the
        // error propagates so redeliveries observe it.
        match self.apply_effects(&event).await {
            Ok(Some(reason)) => {
                self.events.mark_completed(&key, Some(reason.clone())).await?;
                Ok(IngestOutcome::Ignored {
                    idempotency_key: key,
                    reason,
                })
            }
            Ok(None) => {
                self.events.mark_completed(&key, None).await?;
                Ok(IngestOutcome::Processed {
                    idempotency_key: key,
                })
            }
            Err(e) => {
                self.events.mark_failed(&key, e.to_string()).await?;
                Err(e)
            }
        }
    }

    /// Looks the payment up at the gateway and applies subscription effects.
    ///
    /// Returns `Ok(Some(reason))` for graceful no-ops.
    async fn apply_effects(&self, event: &GatewayEvent) -> Result<Option<String>, LedgerError> {
        let payment = self
            .gateway
            .find_payment(&event.payment_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("payment", &event.payment_id))?;

        let Some(store) = self
            .stores
            .find_by_gateway_reference(payment.store_reference())
            .await?
        else {
            return Ok(Some(format!(
                "no store matches gateway reference '{}'",
                payment.store_reference()
            )));
        };

        let Some(next_status) = Self::subscription_effect(&payment) else {
            return Ok(Some(format!(
                "payment status {:?} requires no subscription change",
                payment.status
            )));
        };

        self.stores
            .set_subscription_status(&store.id, next_status)
            .await?;
        tracing::info!(
            store_id = %store.id,
            payment_id = %payment.id,
            subscription_status = next_status.as_str(),
            "store subscription updated from gateway webhook"
        );
        Ok(None)
    }

    /// Maps the gateway's payment status onto the store subscription.
    fn subscription_effect(payment: &GatewayPayment) -> Option<SubscriptionStatus> {
        if payment.status.settles() {
            Some(SubscriptionStatus::Active)
        } else if payment.status.revokes() {
            Some(SubscriptionStatus::Cancelled)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateway::MockPaymentGateway;
    use crate::adapters::memory::{InMemoryStoreRepository, InMemoryWebhookEventRepository};
    use crate::domain::foundation::StoreId;
    use crate::domain::gateway::PaymentStatus;
    use crate::domain::store::Store;
    use rust_decimal_macros::dec;

    struct Fixture {
        handler: IngestWebhookHandler,
        gateway: Arc<MockPaymentGateway>,
        stores: Arc<InMemoryStoreRepository>,
    }

    fn fixture() -> Fixture {
        let gateway = Arc::new(MockPaymentGateway::new());
        let events = Arc::new(InMemoryWebhookEventRepository::new());
        let stores = Arc::new(InMemoryStoreRepository::new());
        Fixture {
            handler: IngestWebhookHandler::new(gateway.clone(), events, stores.clone()),
            gateway,
            stores,
        }
    }

    fn payment(id: &str, status: PaymentStatus) -> GatewayPayment {
        GatewayPayment {
            id: id.to_string(),
            customer: "cus_1".to_string(),
            subscription: Some("sub_1".to_string()),
            status,
            value: dec!(49.90),
        }
    }

    fn pending_store() -> Store {
        Store {
            id: StoreId::new(),
            name: "Loja Central".to_string(),
            gateway_customer_id: Some("cus_1".to_string()),
            gateway_subscription_id: Some("sub_1".to_string()),
            subscription_status: SubscriptionStatus::Pending,
            updated_at: Utc::now(),
        }
    }

    fn body(event: &str, payment_id: &str) -> Vec<u8> {
        format!(
            r#"{{"event":"{}","payment":{{"id":"{}"}},"dateCreated":"2025-01-15 10:00:00"}}"#,
            event, payment_id
        )
        .into_bytes()
    }

    fn command(f: &Fixture, event: &str, payment_id: &str) -> IngestWebhookCommand {
        let payload = body(event, payment_id);
        let signature = f.gateway.sign(&payload);
        IngestWebhookCommand {
            payload,
            signature: Some(signature),
        }
    }

    #[tokio::test]
    async fn confirmed_payment_activates_store_subscription() {
        let f = fixture();
        let store = pending_store();
        f.stores.seed(store.clone()).await;
        f.gateway.seed_payment(payment("pay_1", PaymentStatus::Confirmed));

        let outcome = f
            .handler
            .handle(command(&f, "PAYMENT_CONFIRMED", "pay_1"))
            .await
            .unwrap();

        assert!(matches!(outcome, IngestOutcome::Processed { .. }));
        let updated = f.stores.find_by_id(&store.id).await.unwrap().unwrap();
        assert_eq!(updated.subscription_status, SubscriptionStatus::Active);
    }

    #[tokio::test]
    async fn overdue_payment_cancels_store_subscription() {
        let f = fixture();
        let mut store = pending_store();
        store.subscription_status = SubscriptionStatus::Active;
        f.stores.seed(store.clone()).await;
        f.gateway.seed_payment(payment("pay_2", PaymentStatus::Overdue));

        f.handler
            .handle(command(&f, "PAYMENT_OVERDUE", "pay_2"))
            .await
            .unwrap();

        let updated = f.stores.find_by_id(&store.id).await.unwrap().unwrap();
        assert_eq!(updated.subscription_status, SubscriptionStatus::Cancelled);
    }

    #[tokio::test]
    async fn redelivery_short_circuits_with_stored_outcome() {
        let f = fixture();
        let store = pending_store();
        f.stores.seed(store.clone()).await;
        f.gateway.seed_payment(payment("pay_3", PaymentStatus::Confirmed));

        let first = f
            .handler
            .handle(command(&f, "PAYMENT_CONFIRMED", "pay_3"))
            .await
            .unwrap();
        let IngestOutcome::Processed { idempotency_key } = first else {
            panic!("expected Processed, got {:?}", first);
        };

        // revert the store so a second application would be visible
        f.stores
            .set_subscription_status(&store.id, SubscriptionStatus::Pending)
            .await
            .unwrap();

        let second = f
            .handler
            .handle(command(&f, "PAYMENT_CONFIRMED", "pay_3"))
            .await
            .unwrap();
        assert_eq!(
            second,
            IngestOutcome::Duplicate {
                idempotency_key,
                status: WebhookEventStatus::Completed,
                error_message: None,
            }
        );

        // side effects did not run again
        let stored = f.stores.find_by_id(&store.id).await.unwrap().unwrap();
        assert_eq!(stored.subscription_status, SubscriptionStatus::Pending);
    }

    #[tokio::test]
    async fn missing_signature_is_rejected_before_parsing() {
        let f = fixture();
        let result = f
            .handler
            .handle(IngestWebhookCommand {
                payload: b"{}".to_vec(),
                signature: None,
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Authentication(_))));
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_before_parsing() {
        let f = fixture();
        // payload is not even JSON: authentication must fail first
        let result = f
            .handler
            .handle(IngestWebhookCommand {
                payload: b"garbage".to_vec(),
                signature: Some("deadbeef".to_string()),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Authentication(_))));
    }

    #[tokio::test]
    async fn malformed_payload_is_validation_error() {
        let f = fixture();
        let payload = b"{\"event\": 1}".to_vec();
        let signature = f.gateway.sign(&payload);
        let result = f
            .handler
            .handle(IngestWebhookCommand {
                payload,
                signature: Some(signature),
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Validation { .. })));
    }

    #[tokio::test]
    async fn unknown_event_type_is_acknowledged_without_gateway_lookup() {
        let f = fixture();
        // nothing seeded at the gateway: a lookup would fail
        let outcome = f
            .handler
            .handle(command(&f, "INVOICE_SPLIT_SETTLED", "pay_x"))
            .await
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Ignored { .. }));
    }

    #[tokio::test]
    async fn unknown_payment_fails_the_event_and_is_replayed_as_stored_failure() {
        let f = fixture();
        let result = f
            .handler
            .handle(command(&f, "PAYMENT_CONFIRMED", "pay_missing"))
            .await;
        assert!(matches!(result, Err(LedgerError::NotFound { .. })));

        // redelivery observes the stored failure without a second lookup
        let second = f
            .handler
            .handle(command(&f, "PAYMENT_CONFIRMED", "pay_missing"))
            .await
            .unwrap();
        match second {
            IngestOutcome::Duplicate { status, error_message, .. } => {
                assert_eq!(status, WebhookEventStatus::Failed);
                assert!(error_message.unwrap().contains("not found"));
            }
            other => panic!("expected Duplicate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn gateway_timeout_marks_event_failed() {
        let f = fixture();
        f.gateway.fail_next_lookup("connection timed out");
        let result = f
            .handler
            .handle(command(&f, "PAYMENT_CONFIRMED", "pay_t"))
            .await;
        assert!(matches!(result, Err(LedgerError::Gateway(_))));
    }

    #[tokio::test]
    async fn payment_without_matching_store_is_a_graceful_no_op() {
        let f = fixture();
        f.gateway.seed_payment(payment("pay_5", PaymentStatus::Confirmed));
        let outcome = f
            .handler
            .handle(command(&f, "PAYMENT_CONFIRMED", "pay_5"))
            .await
            .unwrap();
        match outcome {
            IngestOutcome::Ignored { reason, .. } => {
                assert!(reason.contains("no store matches"));
            }
            other => panic!("expected Ignored, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn pending_payment_status_changes_nothing() {
        let f = fixture();
        let store = pending_store();
        f.stores.seed(store.clone()).await;
        f.gateway.seed_payment(payment("pay_6", PaymentStatus::Pending));

        let outcome = f
            .handler
            .handle(command(&f, "PAYMENT_CREATED", "pay_6"))
            .await
            .unwrap();
        assert!(matches!(outcome, IngestOutcome::Ignored { .. }));

        let stored = f.stores.find_by_id(&store.id).await.unwrap().unwrap();
        assert_eq!(stored.subscription_status, SubscriptionStatus::Pending);
    }
}

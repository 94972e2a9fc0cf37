//! Axum HTTP surface.
//!
//! One module per resource (`rates`, `transactions`, `payouts`, `webhooks`),
//! each with its DTOs, handlers, and router, assembled by [`app_router`].

pub mod payouts;
pub mod rates;
pub mod transactions;
pub mod webhooks;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::application::handlers::{
    CreatePayoutHandler, IngestWebhookHandler, ManageRatesHandler, RecordCommissionHandler,
    UpdatePayoutStatusHandler,
};
use crate::domain::foundation::LedgerError;
use crate::ports::{PayoutRepository, TransactionRepository};

/// Upper bound for any request; webhook gateway lookups are bounded tighter
/// by the gateway client itself.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub rates: Arc<ManageRatesHandler>,
    pub record_commission: Arc<RecordCommissionHandler>,
    pub create_payout: Arc<CreatePayoutHandler>,
    pub update_payout_status: Arc<UpdatePayoutStatusHandler>,
    pub ingest_webhook: Arc<IngestWebhookHandler>,
    pub payout_reads: Arc<dyn PayoutRepository>,
    pub transaction_reads: Arc<dyn TransactionRepository>,
}

/// Assembles the complete application router.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/commission-rates", rates::routes())
        .nest("/api/commission-transactions", transactions::routes())
        .nest("/api/payouts", payouts::routes())
        .nest("/api/webhooks", webhooks::routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// Wire format for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub message: String,
}

/// API error type converting engine errors into HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Engine(LedgerError),
    /// The upstream auth collaborator supplied no operator identity.
    Forbidden(String),
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError::Engine(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::Forbidden(message) => (StatusCode::FORBIDDEN, "FORBIDDEN", message),
            ApiError::Engine(err) => {
                let (status, code) = match &err {
                    LedgerError::Validation { .. } => {
                        (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
                    }
                    LedgerError::InvalidTransition { .. } => {
                        (StatusCode::BAD_REQUEST, "INVALID_STATUS_TRANSITION")
                    }
                    LedgerError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    LedgerError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                    LedgerError::Authentication(_) => {
                        (StatusCode::UNAUTHORIZED, "INVALID_SIGNATURE")
                    }
                    LedgerError::Gateway(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "GATEWAY_ERROR")
                    }
                    LedgerError::Storage(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.to_string())
            }
        };

        let body = ErrorResponse {
            error: code,
            message,
        };
        (status, Json(body)).into_response()
    }
}

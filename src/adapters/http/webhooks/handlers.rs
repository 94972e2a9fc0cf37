//! Handler for the gateway webhook endpoint.
//!
//! The body is taken as raw bytes so the signature is verified over exactly
//! what the gateway sent, before any parsing.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::{ApiError, AppState, ErrorResponse};
use crate::application::handlers::{IngestOutcome, IngestWebhookCommand};
use crate::ports::WebhookEventStatus;

/// Header names the gateway is known to send the signature under.
const SIGNATURE_HEADERS: [&str; 3] = ["asaas-signature", "x-signature", "signature"];

fn signature_from(headers: &HeaderMap) -> Option<String> {
    SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

pub async fn handle_gateway_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let outcome = state
        .ingest_webhook
        .handle(IngestWebhookCommand {
            payload: body.to_vec(),
            signature: signature_from(&headers),
        })
        .await?;

    let response = match outcome {
        IngestOutcome::Processed { .. } | IngestOutcome::Ignored { .. } => {
            Json(serde_json::json!({"received": true})).into_response()
        }
        IngestOutcome::Duplicate { status, error_message, .. } => match status {
            // the first delivery's outcome, replayed verbatim
            WebhookEventStatus::Completed | WebhookEventStatus::Processing => {
                Json(serde_json::json!({"received": true, "duplicate": true})).into_response()
            }
            WebhookEventStatus::Failed => {
                let body = ErrorResponse {
                    error: "WEBHOOK_PROCESSING_FAILED",
                    message: error_message
                        .unwrap_or_else(|| "stored webhook processing failure".to_string()),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        },
    };
    Ok(response)
}

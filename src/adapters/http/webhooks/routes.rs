//! Router for the webhook endpoint.
//!
//! - `POST /gateway` - ingest a gateway notification. 200 on success or
//!   graceful no-op, 401 on a bad signature, 400 on a malformed body,
//!   404 for a payment unknown to the gateway, 500 on processing failure
//!   (the gateway retries; redeliveries are idempotent).
//!
//! No authentication middleware: the signature is the authentication.

use axum::routing::post;
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::handle_gateway_webhook;

pub fn routes() -> Router<AppState> {
    Router::new().route("/gateway", post(handle_gateway_webhook))
}

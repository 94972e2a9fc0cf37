//! Router for the payout endpoints.
//!
//! - `POST /` - create a payout for (store, period); 409 on duplicate,
//!   400 when the period has no calculated commission
//! - `GET /` - list a store's payouts (`?store_id=`)
//! - `GET /{id}` - fetch one payout
//! - `PATCH /{id}/status` - drive the lifecycle; 400 on an invalid
//!   transition, 403 without an operator identity

use axum::routing::{get, patch, post};
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::{create_payout, get_payout, list_payouts, update_payout_status};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payout).get(list_payouts))
        .route("/:id", get(get_payout))
        .route("/:id/status", patch(update_payout_status))
}

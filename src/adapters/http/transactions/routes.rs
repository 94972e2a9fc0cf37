//! Router for the commission-transaction endpoints.
//!
//! - `POST /` - record commission for a completed order
//! - `GET /` - reporting reads (`?store_id=&status=&created_from=&created_until=`)
//!
//! There is deliberately no endpoint that marks a transaction `paid`; that
//! transition only happens through payout completion.

use axum::routing::get;
use axum::Router;

use crate::adapters::http::AppState;

use super::handlers::{list_transactions, record_transaction};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_transactions).post(record_transaction))
}

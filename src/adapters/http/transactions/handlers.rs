//! Handlers for the commission-transaction endpoints.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::{ApiError, AppState};
use crate::application::handlers::RecordCommissionCommand;

use super::dto::{ListTransactionsQuery, RecordTransactionRequest, TransactionResponse};

pub async fn record_transaction(
    State(state): State<AppState>,
    Json(request): Json<RecordTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = state
        .record_commission
        .handle(RecordCommissionCommand {
            store_id: request.store_id,
            category_id: request.category_id,
            order_id: request.order_id,
            order_amount: request.order_amount,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(TransactionResponse::from(transaction))))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.into_filter()?;
    let transactions = state.transaction_reads.list(&filter).await?;
    let body: Vec<TransactionResponse> =
        transactions.into_iter().map(TransactionResponse::from).collect();
    Ok(Json(body))
}

//! Handlers for the payout endpoints.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::{ApiError, AppState};
use crate::application::handlers::{CreatePayoutCommand, UpdatePayoutStatusCommand};
use crate::domain::foundation::{LedgerError, OperatorId, PayoutId};

use super::dto::{CreatePayoutRequest, ListPayoutsQuery, PayoutResponse, UpdatePayoutStatusRequest};

/// Header the upstream auth middleware uses to pass the operator identity.
const OPERATOR_HEADER: &str = "x-operator-id";

/// Extracts the operator identity placed by the auth collaborator.
fn operator_from(headers: &HeaderMap) -> Result<OperatorId, ApiError> {
    let value = headers
        .get(OPERATOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::Forbidden("operator identity required for payout transitions".to_string())
        })?;
    OperatorId::new(value).map_err(ApiError::from)
}

pub async fn create_payout(
    State(state): State<AppState>,
    Json(request): Json<CreatePayoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payout = state
        .create_payout
        .handle(CreatePayoutCommand {
            store_id: request.store_id,
            period: request.period,
            notes: request.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(PayoutResponse::from(payout))))
}

pub async fn update_payout_status(
    State(state): State<AppState>,
    Path(id): Path<PayoutId>,
    headers: HeaderMap,
    Json(request): Json<UpdatePayoutStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let operator = operator_from(&headers)?;
    let payout = state
        .update_payout_status
        .handle(UpdatePayoutStatusCommand {
            payout_id: id,
            new_status: request.status,
            operator,
            notes: request.notes,
            payment_reference: request.payment_reference,
        })
        .await?;
    Ok(Json(PayoutResponse::from(payout)))
}

pub async fn get_payout(
    State(state): State<AppState>,
    Path(id): Path<PayoutId>,
) -> Result<impl IntoResponse, ApiError> {
    let payout = state
        .payout_reads
        .find_by_id(&id)
        .await?
        .ok_or_else(|| LedgerError::not_found("payout", id))?;
    Ok(Json(PayoutResponse::from(payout)))
}

pub async fn list_payouts(
    State(state): State<AppState>,
    Query(query): Query<ListPayoutsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let payouts = state.payout_reads.list_by_store(&query.store_id).await?;
    let body: Vec<PayoutResponse> = payouts.into_iter().map(PayoutResponse::from).collect();
    Ok(Json(body))
}

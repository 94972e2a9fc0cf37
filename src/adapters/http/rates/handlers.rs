//! Handlers for the commission-rate endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use crate::adapters::http::{ApiError, AppState};
use crate::domain::foundation::RateId;

use super::dto::{RateRequest, RateResponse};

pub async fn list_rates(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let rates = state.rates.list().await?;
    let body: Vec<RateResponse> = rates.into_iter().map(RateResponse::from).collect();
    Ok(Json(body))
}

pub async fn create_rate(
    State(state): State<AppState>,
    Json(request): Json<RateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rate = state.rates.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(RateResponse::from(rate))))
}

pub async fn get_rate(
    State(state): State<AppState>,
    Path(id): Path<RateId>,
) -> Result<impl IntoResponse, ApiError> {
    let rate = state.rates.get(id).await?;
    Ok(Json(RateResponse::from(rate)))
}

pub async fn update_rate(
    State(state): State<AppState>,
    Path(id): Path<RateId>,
    Json(request): Json<RateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rate = state.rates.update(id, request.into()).await?;
    Ok(Json(RateResponse::from(rate)))
}

pub async fn delete_rate(
    State(state): State<AppState>,
    Path(id): Path<RateId>,
) -> Result<impl IntoResponse, ApiError> {
    state.rates.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn deactivate_rate(
    State(state): State<AppState>,
    Path(id): Path<RateId>,
) -> Result<impl IntoResponse, ApiError> {
    let rate = state.rates.deactivate(id).await?;
    Ok(Json(RateResponse::from(rate)))
}

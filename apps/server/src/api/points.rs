use std::sync::Arc;

use super::ApiJson;
use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use itinero_core::points::{ConfirmOutcome, LedgerEntry, PointsQuote};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteRequest {
    user_id: String,
    points: f64,
}

#[derive(Deserialize)]
struct ConfirmRequest {
    reference: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualPointsRequest {
    user_id: String,
    delta: f64,
    reason: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceResponse {
    user_id: String,
    balance: f64,
}

async fn request_quote(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<QuoteRequest>,
) -> ApiResult<(StatusCode, Json<PointsQuote>)> {
    let quote = state
        .points_service
        .request_quote(&req.user_id, req.points)
        .await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

async fn get_quote(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<PointsQuote>> {
    let quote = state.points_service.get_quote(&id)?;
    Ok(Json(quote))
}

async fn confirm_payment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ConfirmRequest>,
) -> ApiResult<Json<ConfirmOutcome>> {
    let outcome = state
        .points_service
        .confirm_payment(&id, &req.reference)
        .await?;
    Ok(Json(outcome))
}

async fn add_manual_points(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ManualPointsRequest>,
) -> ApiResult<(StatusCode, Json<LedgerEntry>)> {
    let entry = state
        .points_service
        .add_manual_points(&req.user_id, req.delta, req.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_balance(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<BalanceResponse>> {
    let balance = state.points_service.get_balance(&user_id)?;
    Ok(Json(BalanceResponse { user_id, balance }))
}

async fn get_ledger(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<LedgerEntry>>> {
    let entries = state.points_service.get_ledger(&user_id)?;
    Ok(Json(entries))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/points/quotes", post(request_quote))
        .route("/points/quotes/{id}", get(get_quote))
        .route("/points/quotes/{id}/confirm", post(confirm_payment))
        .route("/points/ledger", post(add_manual_points))
        .route("/points/users/{user_id}/balance", get(get_balance))
        .route("/points/users/{user_id}/ledger", get(get_ledger))
}

use std::sync::Arc;

use super::{ApiJson, ApiQuery};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use itinero_core::fx::{CurrencyInfo, FxSnapshot, NewFxSnapshot, RecordOutcome, WORLD_CURRENCIES};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct BaseQuery {
    base: Option<String>,
}

#[derive(Deserialize)]
struct ConvertQuery {
    amount: Option<f64>,
    from: String,
    to: String,
    base: Option<String>,
}

#[derive(Serialize)]
struct ConvertResponse {
    amount: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordSnapshotResponse {
    created: bool,
    snapshot: FxSnapshot,
}

fn base_or_default<'a>(state: &'a AppState, base: &'a Option<String>) -> &'a str {
    base.as_deref().unwrap_or(&state.fx_base_currency)
}

async fn get_latest_snapshot(
    State(state): State<Arc<AppState>>,
    ApiQuery(q): ApiQuery<BaseQuery>,
) -> ApiResult<Json<FxSnapshot>> {
    let base = base_or_default(&state, &q.base);
    state
        .fx_service
        .get_latest_snapshot(base)?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No FX snapshot for base {}", base)))
}

async fn convert_amount(
    State(state): State<Arc<AppState>>,
    ApiQuery(q): ApiQuery<ConvertQuery>,
) -> ApiResult<Json<ConvertResponse>> {
    let Some(amount) = q.amount else {
        return Ok(Json(ConvertResponse { amount: None }));
    };
    let base = base_or_default(&state, &q.base);
    let converted = state
        .fx_service
        .convert_latest(amount, &q.from, &q.to, base)?;
    Ok(Json(ConvertResponse { amount: converted }))
}

async fn record_snapshot(
    State(state): State<Arc<AppState>>,
    ApiJson(snapshot): ApiJson<NewFxSnapshot>,
) -> ApiResult<(StatusCode, Json<RecordSnapshotResponse>)> {
    let outcome = state.fx_service.record_snapshot(snapshot).await?;
    let status = match outcome {
        RecordOutcome::Created(_) => StatusCode::CREATED,
        RecordOutcome::AlreadyExists(_) => StatusCode::OK,
    };
    let created = matches!(outcome, RecordOutcome::Created(_));
    Ok((
        status,
        Json(RecordSnapshotResponse {
            created,
            snapshot: outcome.into_snapshot(),
        }),
    ))
}

async fn list_currencies() -> Json<&'static [CurrencyInfo]> {
    Json(WORLD_CURRENCIES)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/fx/latest", get(get_latest_snapshot))
        .route("/fx/convert", get(convert_amount))
        .route("/fx/snapshots", post(record_snapshot))
        .route("/currencies", get(list_currencies))
}

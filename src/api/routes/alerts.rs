//! Alert endpoints

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use tracing::info;

use crate::{
    api::{
        error::{ApiError, ApiResult},
        state::ApiState,
        types::AlertQuery,
    },
    storage::schema::{Alert, AlertStatus, AlertTransition, NewAlert},
};

/// GET /api/alerts?status=&limit=
///
/// Without a status filter only active alerts are listed.
pub async fn list_alerts(
    State(state): State<ApiState>,
    query: Result<Query<AlertQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Alert>>> {
    let Query(query) = query?;
    let status = query.status.unwrap_or(AlertStatus::Active);
    Ok(Json(state.store.list_alerts(Some(status), query.limit).await?))
}

/// POST /api/alerts
///
/// Stores a manually raised alert and pushes it to subscribers
pub async fn create_alert(
    State(state): State<ApiState>,
    payload: Result<Json<NewAlert>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Alert>)> {
    let Json(new_alert) = payload?;
    let alert = state.ingestor.create_alert(new_alert).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// PATCH /api/alerts/{id}
pub async fn update_alert(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<AlertTransition>, JsonRejection>,
) -> ApiResult<Json<Alert>> {
    let Path(id) = path?;
    let Json(transition) = payload?;

    let alert = state
        .store
        .transition_alert(id, transition)
        .await?
        .ok_or_else(|| ApiError::not_found("alert"))?;

    info!("alert {} is now {}", alert.id, alert.status);
    Ok(Json(alert))
}

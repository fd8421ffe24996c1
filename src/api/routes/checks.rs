//! Check result ingestion endpoints

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};

use crate::{
    api::{error::ApiResult, state::ApiState, types::MonitorResponse},
    ingest::{CheckSubmission, MonitorSubmission},
    storage::schema::CheckResult,
};

/// POST /api/check-results
pub async fn submit_check_result(
    State(state): State<ApiState>,
    payload: Result<Json<CheckSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CheckResult>)> {
    let Json(submission) = payload?;
    let outcome = state.ingestor.submit_check(submission).await?;
    Ok((StatusCode::CREATED, Json(outcome.check_result)))
}

/// POST /api/monitor
///
/// Entry point for external monitoring scripts
pub async fn submit_monitor(
    State(state): State<ApiState>,
    payload: Result<Json<MonitorSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MonitorResponse>)> {
    let Json(submission) = payload?;
    let outcome = state.ingestor.submit_monitor(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(MonitorResponse {
            success: true,
            check_result: outcome.check_result,
        }),
    ))
}

//! Uptime statistics endpoints

use axum::{
    Json,
    extract::{Path, State, rejection::{JsonRejection, PathRejection}},
    http::StatusCode,
};

use crate::{
    api::{
        error::{ApiError, ApiResult},
        state::ApiState,
    },
    storage::schema::{NewUptimeStat, UptimeStat},
};

/// GET /api/sites/{id}/uptime-stats
pub async fn site_uptime_stats(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<UptimeStat>>> {
    let Path(id) = path?;
    Ok(Json(state.store.uptime_stats_by_site(id).await?))
}

/// POST /api/uptime-stats
pub async fn create_uptime_stat(
    State(state): State<ApiState>,
    payload: Result<Json<NewUptimeStat>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UptimeStat>)> {
    let Json(stat) = payload?;

    if stat.site_id == 0 {
        return Err(ApiError::InvalidRequest(
            "siteId must be a positive integer".to_string(),
        ));
    }
    if !(0.0..=100.0).contains(&stat.uptime_percentage) {
        return Err(ApiError::InvalidRequest(
            "uptimePercentage must be between 0 and 100".to_string(),
        ));
    }

    let stat = state.store.create_uptime_stat(stat).await?;
    Ok((StatusCode::CREATED, Json(stat)))
}

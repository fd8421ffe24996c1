//! Dashboard statistics endpoint

use axum::{Json, extract::State};

use crate::{
    api::{error::ApiResult, state::ApiState, types::StatsResponse},
    storage::schema::AlertStatus,
};

/// GET /api/stats
///
/// Averages are taken over the latest uptime stat of each site that has one.
pub async fn get_stats(State(state): State<ApiState>) -> ApiResult<Json<StatsResponse>> {
    let sites = state.store.list_sites().await?;
    let active_alerts = state.store.list_alerts(Some(AlertStatus::Active), None).await?;

    let mut latest = Vec::with_capacity(sites.len());
    for site in &sites {
        if let Some(stat) = state.store.uptime_stats_by_site(site.id).await?.into_iter().next() {
            latest.push(stat);
        }
    }

    Ok(Json(StatsResponse::from_latest(
        sites.len(),
        &latest,
        active_alerts.len(),
        state.broadcaster.open_count().await,
    )))
}

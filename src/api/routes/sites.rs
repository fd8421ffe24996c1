//! Site management endpoints

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
        types::{AlertQuery, LimitQuery, SITE_DETAIL_CHECK_LIMIT, SiteDetails, SiteWithStats},
    },
    storage::schema::{Alert, AlertStatus, CheckResult, NewSite, Site, SitePatch, UptimeStat},
};

async fn latest_stat(state: &ApiState, site_id: u64) -> ApiResult<Option<UptimeStat>> {
    Ok(state
        .store
        .uptime_stats_by_site(site_id)
        .await?
        .into_iter()
        .next())
}

/// GET /api/sites
///
/// List all sites, each with its most recent uptime stat
pub async fn list_sites(State(state): State<ApiState>) -> ApiResult<Json<Vec<SiteWithStats>>> {
    let sites = state.store.list_sites().await?;

    let mut enriched = Vec::with_capacity(sites.len());
    for site in sites {
        let stats = latest_stat(&state, site.id).await?;
        enriched.push(SiteWithStats { site, stats });
    }

    Ok(Json(enriched))
}

/// GET /api/sites/{id}
pub async fn get_site(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<SiteDetails>> {
    let Path(id) = path?;
    let site = state
        .store
        .get_site(id)
        .await?
        .ok_or_else(|| ApiError::not_found("site"))?;

    let stats = latest_stat(&state, id).await?;
    let active_alerts = state
        .store
        .alerts_by_site(id, Some(AlertStatus::Active))
        .await?;
    let check_results = state
        .store
        .check_results_by_site(id, Some(SITE_DETAIL_CHECK_LIMIT))
        .await?;

    Ok(Json(SiteDetails {
        site,
        stats,
        active_alerts,
        check_results,
    }))
}

/// POST /api/sites
pub async fn create_site(
    State(state): State<ApiState>,
    payload: Result<Json<NewSite>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Site>)> {
    let Json(new_site) = payload?;

    if new_site.name.trim().is_empty() || new_site.url.trim().is_empty() {
        return Err(ApiError::InvalidRequest(
            "name and url must not be empty".to_string(),
        ));
    }

    let site = state.store.create_site(new_site).await?;
    info!("site {} created ({})", site.id, site.url);

    Ok((StatusCode::CREATED, Json(site)))
}

/// PUT /api/sites/{id}
pub async fn update_site(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<SitePatch>, JsonRejection>,
) -> ApiResult<Json<Site>> {
    let Path(id) = path?;
    let Json(patch) = payload?;

    state
        .store
        .update_site(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("site"))
}

/// DELETE /api/sites/{id}
///
/// Records belonging to the site are left in place.
pub async fn delete_site(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = path?;
    if state.store.delete_site(id).await? {
        info!("site {} deleted", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("site"))
    }
}

/// GET /api/sites/{id}/alerts?status=
pub async fn site_alerts(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<AlertQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Alert>>> {
    let Path(id) = path?;
    let Query(query) = query?;
    let mut alerts = state.store.alerts_by_site(id, query.status).await?;
    if let Some(limit) = query.limit {
        alerts.truncate(limit);
    }
    Ok(Json(alerts))
}

/// GET /api/sites/{id}/check-results?limit=
pub async fn site_check_results(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<CheckResult>>> {
    let Path(id) = path?;
    let Query(query) = query?;
    Ok(Json(state.store.check_results_by_site(id, query.limit).await?))
}

//! AI insight endpoints
//!
//! Insights are produced outside the hub; these routes only store and serve
//! them.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{
    api::{
        error::{ApiError, ApiResult},
        state::ApiState,
        types::LimitQuery,
    },
    storage::schema::{AiInsight, InsightPatch, NewAiInsight},
};

fn check_confidence(confidence: f64) -> ApiResult<()> {
    if (0.0..=1.0).contains(&confidence) {
        Ok(())
    } else {
        Err(ApiError::InvalidRequest(
            "confidence must be between 0 and 1".to_string(),
        ))
    }
}

/// GET /api/ai-insights?limit=
pub async fn list_ai_insights(
    State(state): State<ApiState>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<AiInsight>>> {
    let Query(query) = query?;
    Ok(Json(state.store.list_ai_insights(query.limit).await?))
}

/// GET /api/sites/{id}/ai-insights
pub async fn site_ai_insights(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
) -> ApiResult<Json<Vec<AiInsight>>> {
    let Path(id) = path?;
    Ok(Json(state.store.ai_insights_by_site(id).await?))
}

/// POST /api/ai-insights
pub async fn create_ai_insight(
    State(state): State<ApiState>,
    payload: Result<Json<NewAiInsight>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AiInsight>)> {
    let Json(insight) = payload?;

    if insight.site_id == 0 {
        return Err(ApiError::InvalidRequest(
            "siteId must be a positive integer".to_string(),
        ));
    }
    check_confidence(insight.confidence)?;

    let insight = state.store.create_ai_insight(insight).await?;
    Ok((StatusCode::CREATED, Json(insight)))
}

/// PATCH /api/ai-insights/{id}
pub async fn update_ai_insight(
    State(state): State<ApiState>,
    path: Result<Path<u64>, PathRejection>,
    payload: Result<Json<InsightPatch>, JsonRejection>,
) -> ApiResult<Json<AiInsight>> {
    let Path(id) = path?;
    let Json(patch) = payload?;

    if let Some(confidence) = patch.confidence {
        check_confidence(confidence)?;
    }

    state
        .store
        .update_ai_insight(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("AI insight"))
}

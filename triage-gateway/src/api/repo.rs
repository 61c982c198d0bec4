//! Repository API Handlers
//!
//! Read-only endpoints that relay stored repository data from the backend.

use axum::{
    Json,
    extract::{Query, State},
};
use triage_core::dto::repo::{RepoAnalysis, RepoLogs, RepoQuery, RepoSnippets};

use crate::api::error::{ApiError, ApiResult};
use crate::service::{GatewayState, repo_service};

/// GET /analysis?repo=
/// Get the stored analysis for a repository
pub async fn get_analysis(
    State(state): State<GatewayState>,
    Query(query): Query<RepoQuery>,
) -> ApiResult<Json<RepoAnalysis>> {
    tracing::debug!("Getting analysis for repo: {:?}", query.repo);

    let body = repo_service::fetch_analysis(&state.client, &query)
        .await
        .map_err(|e| ApiError::from_repo(e, "Failed to fetch analysis"))?;

    Ok(Json(body))
}

/// GET /code?repo=
/// Get the stored code snippets for a repository
pub async fn get_snippets(
    State(state): State<GatewayState>,
    Query(query): Query<RepoQuery>,
) -> ApiResult<Json<RepoSnippets>> {
    tracing::debug!("Getting code snippets for repo: {:?}", query.repo);

    let body = repo_service::fetch_snippets(&state.client, &query)
        .await
        .map_err(|e| ApiError::from_repo(e, "Failed to fetch code snippets"))?;

    Ok(Json(body))
}

/// GET /logs?repo=
/// Get the stored logs for a repository
pub async fn get_logs(
    State(state): State<GatewayState>,
    Query(query): Query<RepoQuery>,
) -> ApiResult<Json<RepoLogs>> {
    tracing::debug!("Getting logs for repo: {:?}", query.repo);

    let body = repo_service::fetch_logs(&state.client, &query)
        .await
        .map_err(|e| ApiError::from_repo(e, "Failed to fetch logs"))?;

    Ok(Json(body))
}

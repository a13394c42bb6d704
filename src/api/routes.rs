// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP endpoints for branch environment management.
//!
//! The deploy, refresh and teardown routes accept a token either as a
//! bearer header or as the `?token=` query parameter when a token store
//! is configured. Read routes are always open.

use crate::api::auth::TokenStore;
use crate::context::sanitize_branch_name;
use crate::error::EmmieError;
use crate::lifecycle::{DeployOutcome, EnvironmentSummary, LifecycleManager};
use axum::{
    extract::{Json, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use k8s_openapi::api::apps::v1::Deployment;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Shared state handed to every request handler
pub struct AppState {
    pub lifecycle: LifecycleManager,
    pub tokens: Option<TokenStore>,
}

/// Build the service router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/version", get(version))
        .route("/deploy", get(list_environments))
        .route("/deploy/{image_namespace}/{branch_name}", post(deploy_branch))
        .route("/deploy/{branch_name}", put(refresh_branch).delete(teardown_branch))
        .route("/deployments/{namespace}/{name}", get(get_deployment))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct AuthQuery {
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct OperationResponse {
    branch: String,
    outcome: String,
}

/// API errors for branch environment operations
#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("Invalid or missing token")]
    Unauthorized,
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    Emmie(#[from] EmmieError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Emmie(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Emmie(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

fn authorize(state: &AppState, headers: &HeaderMap, query_token: Option<&str>) -> Result<(), ApiError> {
    let Some(tokens) = &state.tokens else {
        return Ok(());
    };
    let header_token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match header_token.or(query_token) {
        Some(token) if tokens.is_valid(token) => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

/// GET /
async fn index() -> &'static str {
    "Hello, welcome to Emmie!"
}

/// GET /version
async fn version() -> Json<&'static str> {
    Json(env!("CARGO_PKG_VERSION"))
}

/// POST /deploy/{image_namespace}/{branch_name}
async fn deploy_branch(
    State(state): State<Arc<AppState>>,
    Path((image_namespace, branch_name)): Path<(String, String)>,
    Query(query): Query<AuthQuery>,
    headers: HeaderMap,
) -> Result<Json<OperationResponse>, ApiError> {
    authorize(&state, &headers, query.token.as_deref())?;
    info!("Deploying branch {}", branch_name);

    let outcome = state.lifecycle.deploy(&image_namespace, &branch_name).await?;
    let outcome = match outcome {
        DeployOutcome::Created(_) => "created",
        DeployOutcome::Refreshed { .. } => "refreshed",
    };
    Ok(Json(OperationResponse {
        branch: sanitize_branch_name(&branch_name),
        outcome: outcome.to_string(),
    }))
}

/// PUT /deploy/{branch_name}
async fn refresh_branch(
    State(state): State<Arc<AppState>>,
    Path(branch_name): Path<String>,
    Query(query): Query<AuthQuery>,
    headers: HeaderMap,
) -> Result<Json<OperationResponse>, ApiError> {
    authorize(&state, &headers, query.token.as_deref())?;
    info!("Refreshing branch {}", branch_name);

    state.lifecycle.refresh(&branch_name).await?;
    Ok(Json(OperationResponse {
        branch: sanitize_branch_name(&branch_name),
        outcome: "refreshed".to_string(),
    }))
}

/// DELETE /deploy/{branch_name}
async fn teardown_branch(
    State(state): State<Arc<AppState>>,
    Path(branch_name): Path<String>,
    Query(query): Query<AuthQuery>,
    headers: HeaderMap,
) -> Result<Json<OperationResponse>, ApiError> {
    authorize(&state, &headers, query.token.as_deref())?;
    info!("Tearing down branch {}", branch_name);

    state.lifecycle.teardown(&branch_name).await?;
    Ok(Json(OperationResponse {
        branch: sanitize_branch_name(&branch_name),
        outcome: "deleted".to_string(),
    }))
}

/// GET /deploy
async fn list_environments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EnvironmentSummary>>, ApiError> {
    let environments = state.lifecycle.environments().await?;
    if environments.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Json(environments))
}

/// GET /deployments/{namespace}/{name}
async fn get_deployment(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> Result<Json<Deployment>, ApiError> {
    match state.lifecycle.deployment(&namespace, &name).await? {
        Some(deployment) => Ok(Json(deployment)),
        None => Err(ApiError::NotFound),
    }
}

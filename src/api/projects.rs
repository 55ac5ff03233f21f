/// Project management REST API endpoints
///
/// CRUD over the `projects` collection plus the project overview. Handlers forward to
/// `ProjectStorage` and translate empty results into 404s.

use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::{ApiError, ApiResult, AppState, GUEST_USER_ID};
use crate::project::{NewProject, Project, ProjectOverview, ProjectPatch};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

const NOT_FOUND: &str = "Project not found";

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Only projects owned by this user
    pub user_id: Option<Uuid>,
}

/// Create project management routes
pub fn create_project_routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .route("/api/projects/{id}/overview", get(project_overview))
}

/// List projects, optionally for one owner
///
/// GET /api/projects[?user_id=<uuid>]
/// Returns: [{ "id": "...", "name": "...", ... }] newest first
async fn list_projects(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = match params.user_id {
        Some(user_id) => state.projects.list_projects_for_user(user_id).await?,
        None => state.projects.list_projects().await?,
    };
    tracing::debug!("📋 Listed {} projects", projects.len());
    Ok(Json(projects))
}

/// Create a new project owned by the guest user
///
/// POST /api/projects
/// Body: { "name": "...", "description": "...", "status": "active", "budget": 1000 }
async fn create_project(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Project name is required"));
    }

    let project = state
        .projects
        .create_project(GUEST_USER_ID, &payload)
        .await?
        .ok_or_else(|| ApiError::internal("Insert returned no row"))?;

    tracing::info!("🏗️ Created project: {} ({})", project.id, project.name);
    Ok((StatusCode::CREATED, Json(project)))
}

/// Get a specific project by ID
///
/// GET /api/projects/{id}
async fn get_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Project>> {
    match state.projects.get_project(id).await? {
        Some(project) => Ok(Json(project)),
        None => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// Partially update a project
///
/// PATCH /api/projects/{id}
/// Body: any subset of the project fields
async fn update_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<ProjectPatch>,
) -> ApiResult<Json<Project>> {
    if patch.is_empty() {
        return Err(ApiError::bad_request("Nothing to update"));
    }

    match state.projects.update_project(id, &patch).await? {
        Some(project) => {
            tracing::info!("✏️ Updated project: {}", id);
            Ok(Json(project))
        }
        None => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// Delete a project
///
/// DELETE /api/projects/{id}
/// Returns: { "success": true }
async fn delete_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Value>> {
    state.projects.delete_project(id).await?;
    tracing::info!("🗑️ Deleted project: {}", id);
    Ok(Json(json!({ "success": true })))
}

/// Project with its units and five most recent tasks
///
/// GET /api/projects/{id}/overview
async fn project_overview(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ProjectOverview>> {
    match state.projects.project_overview(id).await? {
        Some(overview) => Ok(Json(overview)),
        None => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// HTTP API Layer
///
/// REST endpoints for the dashboard. Every handler is a thin binding to the hosted
/// data service:
/// - Project CRUD and the project overview
/// - Property free-text search (authenticated)
/// - Dashboard metrics and a connectivity probe
/// - Auth passthrough (sign-up, login, logout, current user)
/// - Contact form embed fragment

use crate::{
    config::FormConfig,
    db::{AuthClient, DataClient, DbError},
    project::ProjectStorage,
};
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use uuid::Uuid;

// Extractors with JSON rejections
pub mod extract;

// Project CRUD endpoints
pub mod projects;

// Property search endpoint
pub mod properties;

// Metrics and database probe endpoints
pub mod dashboard;

// Auth passthrough endpoints
pub mod auth;

// Contact form embed endpoint
pub mod contact;

pub use auth::create_auth_routes;
pub use contact::create_contact_routes;
pub use dashboard::create_dashboard_routes;
pub use projects::create_project_routes;
pub use properties::create_property_routes;

/// Owner assigned to projects created without a signed-in user
pub const GUEST_USER_ID: Uuid = Uuid::nil();
pub const GUEST_EMAIL: &str = "guest@regtime.com";
pub const GUEST_NAME: &str = "Guest User";

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Typed project storage
    pub projects: ProjectStorage,
    /// Raw collection client for the remaining collections
    pub db: DataClient,
    /// Auth service client
    pub auth: AuthClient,
    /// Contact form embed settings
    pub form: FormConfig,
}

/// Handler failure rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

/// Every data service failure surfaces as a 500 with the service's message
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!("❌ Data service call failed: {}", err);
        Self::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

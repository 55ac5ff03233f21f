/// Auth passthrough endpoints
///
/// Forward credentials to the hosted auth service. Without a bearer token the current
/// user is the guest account.

use crate::api::extract::ApiJson;
use crate::api::{
    bearer_token, ApiError, ApiResult, AppState, GUEST_EMAIL, GUEST_NAME, GUEST_USER_ID,
};
use crate::db::{DbError, Session};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    fn validate(&self) -> ApiResult<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::bad_request("Email and password are required"));
        }
        Ok(())
    }
}

pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/user", get(current_user))
        .route("/api/auth/signup", post(sign_up))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
}

/// GET /api/auth/user
/// Returns: { "user": { "id": "...", "email": "..." } }
async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    if let Some(token) = bearer_token(&headers) {
        match state.auth.get_user(token).await? {
            Some(user) => return Ok(Json(json!({ "user": user }))),
            None => return Err(ApiError::unauthorized()),
        }
    }

    Ok(Json(json!({
        "user": {
            "id": GUEST_USER_ID,
            "email": GUEST_EMAIL,
            "name": GUEST_NAME,
        }
    })))
}

/// POST /api/auth/signup
/// Body: { "email": "...", "password": "..." }
async fn sign_up(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> ApiResult<Json<Value>> {
    credentials.validate()?;
    let created = state
        .auth
        .sign_up(credentials.email.trim(), &credentials.password)
        .await
        .map_err(reject_credentials)?;
    tracing::info!("👤 Account created");
    Ok(Json(created))
}

/// POST /api/auth/login
/// Body: { "email": "...", "password": "..." }
async fn login(
    State(state): State<AppState>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> ApiResult<Json<Session>> {
    credentials.validate()?;
    let session = state
        .auth
        .sign_in(credentials.email.trim(), &credentials.password)
        .await
        .map_err(reject_credentials)?;
    Ok(Json(session))
}

/// POST /api/auth/logout with `Authorization: Bearer <token>`
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Json<Value>> {
    let token = bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;
    let success = state.auth.sign_out(token).await?;
    Ok(Json(json!({ "success": success })))
}

/// Client-side auth failures (4xx from the service) keep their meaning
fn reject_credentials(err: DbError) -> ApiError {
    match err.status() {
        Some(status) if (400..500).contains(&status) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_REQUEST);
            ApiError::new(status, err.to_string())
        }
        _ => err.into(),
    }
}

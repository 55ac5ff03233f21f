/// Property search endpoint
///
/// Free-text match over BBL, address and owner name. Requires a signed-in user.

use crate::api::extract::ApiQuery;
use crate::api::{bearer_token, ApiError, ApiResult, AppState};
use crate::db::TextSearch;
use crate::records::{Property, PROPERTIES, PROPERTY_SEARCH_FIELDS};
use axum::{
    extract::State,
    http::HeaderMap,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

/// Maximum rows returned by one search
pub const SEARCH_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub fn create_property_routes() -> Router<AppState> {
    Router::new().route("/api/properties/search", get(search_properties))
}

/// Search properties
///
/// GET /api/properties/search?q=<term>
/// 401 without a valid bearer token, 400 without a term
async fn search_properties(
    State(state): State<AppState>,
    headers: HeaderMap,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> ApiResult<Json<Vec<Property>>> {
    let token = bearer_token(&headers).ok_or_else(ApiError::unauthorized)?;
    match state.auth.get_user(token).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(ApiError::unauthorized()),
        Err(e) => {
            tracing::warn!("⚠️ Could not verify token: {}", e);
            return Err(ApiError::unauthorized());
        }
    }

    let search = TextSearch::new(PROPERTY_SEARCH_FIELDS, params.q.unwrap_or_default());
    if search.is_empty() {
        return Err(ApiError::bad_request("Query parameter required"));
    }

    let properties = state
        .db
        .search(PROPERTIES, &search, Some(SEARCH_LIMIT))
        .await?;
    tracing::debug!(
        "🔍 Property search '{}' matched {} rows",
        search.term(),
        properties.len()
    );
    Ok(Json(properties))
}

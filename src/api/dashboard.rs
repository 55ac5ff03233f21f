/// Dashboard metrics and database connectivity probe

use crate::api::{ApiResult, AppState};
use crate::dashboard::{collect_metrics, DashboardMetrics};
use crate::db::{DbResult, Filters, Query};
use crate::records::USERS;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};

/// Users returned by the probe
const PROBE_SAMPLE: usize = 5;

pub fn create_dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard/metrics", get(dashboard_metrics))
        .route("/api/test-db", get(test_db))
}

/// GET /api/dashboard/metrics
/// Returns: { "totalProjects": 3, "activeProjects": 2, "totalHours": 41.5, "properties": 0 }
async fn dashboard_metrics(State(state): State<AppState>) -> ApiResult<Json<DashboardMetrics>> {
    Ok(Json(collect_metrics(&state.db).await?))
}

/// Read a few users and the user count to prove the data service is reachable
///
/// GET /api/test-db
async fn test_db(State(state): State<AppState>) -> Response {
    match probe(&state).await {
        Ok((users, total)) => Json(json!({
            "success": true,
            "users": users,
            "totalUsers": total,
            "message": "Database connection successful",
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("❌ Database probe failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn probe(state: &AppState) -> DbResult<(Vec<Value>, u64)> {
    let users: Vec<Value> = state
        .db
        .select_query(USERS, &Query::new("*").limit(PROBE_SAMPLE))
        .await?;
    let total = state.db.count(USERS, &Filters::new()).await?;
    Ok((users, total))
}

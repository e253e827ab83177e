use axum::extract::State;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is alive", body = String, content_type = "text/plain")
    ),
    tag = "Core"
)]
pub async fn health() -> &'static str {
    "ok"
}

#[utoipa::path(
    get,
    path = "/db-health",
    responses(
        (status = 200, description = "Subscription store is reachable", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = crate::error::ErrorBody)
    ),
    tag = "Core"
)]
pub async fn db_health(State(state): State<AppState>) -> ApiResult<&'static str> {
    state.store.ping().await.map_err(ApiError::Store)?;
    Ok("ok")
}

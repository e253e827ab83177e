use axum::{
    Router,
    http::{Method, header},
    routing::get,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;
use crate::app::{docs, openapi};
use crate::config::AppConfig;

pub fn build_router(state: AppState, config: &AppConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    let api_doc = openapi::api_doc(&config.api_prefix);

    Router::new()
        .merge(crate::core::http::routes())
        .nest(&config.api_prefix, crate::subscriptions::http::routes())
        .route("/docs", get(docs::swagger_ui))
        .route(
            "/api-docs/openapi.json",
            get(move || docs::openapi_spec(api_doc.clone())),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

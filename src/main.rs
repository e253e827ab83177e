use std::sync::Arc;

use group_access::{
    AppState,
    app::router::build_router,
    config::AppConfig,
    subscriptions::{MemorySubscriptionStore, PgSubscriptionStore, SubscriptionStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().expect("invalid configuration");

    let store: Arc<dyn SubscriptionStore> = match &config.database_url {
        Some(database_url) => {
            let store = PgSubscriptionStore::connect(database_url, config.db_max_connections)
                .await
                .expect("failed to connect to Postgres");
            store.migrate().await.expect("failed to run migrations");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set, subscriptions are kept in memory");
            Arc::new(MemorySubscriptionStore::new())
        }
    };

    let app = build_router(AppState { store }, &config);
    tracing::info!("listening on http://{}{}", config.bind_addr, config.api_prefix);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}

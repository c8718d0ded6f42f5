use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatepass::{
    cache::CacheService, config::Config, controllers, database::Database,
    services::identity::IdentityClient, store::PgTicketStore, AppState,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gatepass API");

    // Connect to the database
    let db = Database::new(&config.database.url, config.database.pool_size)
        .await
        .expect("Failed to connect to database");
    info!("Database connected");

    // Run migrations
    db.run_migrations()
        .await
        .expect("Failed to run migrations");

    // Identity token cache
    let cache = CacheService::connect(&config.redis.url, config.identity.cache_ttl_seconds)
        .await
        .expect("Failed to connect to Redis");
    info!("Redis connected");

    let store = Arc::new(PgTicketStore::new(db.pool.clone()));
    let identity = IdentityClient::from_config(&config.identity);

    // Create the shared application state
    let app_state = Arc::new(AppState {
        store,
        identity,
        cache,
        config: config.clone(),
    });

    // Create the main router
    let app = Router::new()
        .route("/", get(|| async { "Gatepass API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        // Mount the routes from the controllers module
        .nest("/api", controllers::routes())
        // Pass the application state to the router
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.app.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}

use auth::TokenService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use configuration::{Config, StorageBackend};
use database::{DbRepository, MemoryStore, ProfileStore};
use events::WsMessage;
use profile_service::ProfileService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// Capacity of the change-event channel. Slow WebSocket subscribers that
/// fall further behind than this skip ahead rather than block publishers.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub service: ProfileService,
    pub tokens: TokenService,
    pub events: broadcast::Sender<WsMessage>,
    pub credentials: configuration::Auth,
}

/// Builds the application router over the given state.
///
/// Split out of `run_server` so integration tests can drive the router
/// directly against an in-memory store.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // Routes that require a validated bearer credential.
    let protected = Router::new()
        .route(
            "/api/transactions/:user_id/add",
            post(handlers::add_transaction),
        )
        .route(
            "/api/transactions/:user_id",
            get(handlers::get_user_transactions),
        )
        .route("/api/analytics/summary", get(handlers::get_analytics_summary))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::require_bearer,
        ));

    // --- DEFINE THE APPLICATION ROUTES ---
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::login))
        .route(
            "/api/users",
            get(handlers::get_users).post(handlers::create_user),
        )
        .route("/api/users/search", get(handlers::search_by_name))
        .route("/api/users/by-tier/:tier", get(handlers::get_by_tier))
        .route(
            "/api/users/by-balance-range",
            get(handlers::get_by_balance_range),
        )
        .route(
            "/api/users/:id",
            get(handlers::get_user_by_id)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/ws", get(handlers::websocket_handler))
        .merge(protected)
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024 * 2)) // Set a 2MB body limit
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Note: Tracing is already initialized in main.rs, so we don't need to
    // initialize it again here.

    let store: Arc<dyn ProfileStore> = match config.storage.backend {
        StorageBackend::Postgres => {
            let db_pool = database::connect().await?;
            database::run_migrations(&db_pool).await?;
            Arc::new(DbRepository::new(db_pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using the in-memory storage backend; state is lost on restart.");
            Arc::new(MemoryStore::new())
        }
    };

    let service = ProfileService::new(store);
    let tokens = TokenService::new(config.auth.secret_key.clone(), config.auth.token_ttl_hours);
    let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

    let state = Arc::new(AppState {
        service,
        tokens,
        events: event_tx,
        credentials: config.auth,
    });

    let app = build_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

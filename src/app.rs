use axum::{extract::DefaultBodyLimit, extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::{AppConfig, StoreBackend};
use crate::database::fixture::Fixture;
use crate::database::{DatabaseError, DatabaseManager, DocumentStore, MemoryStore, PgStore};
use crate::handlers;
use crate::services::{store_call, LoginService, TrainingPathService};

/// Services built once at start-up and shared by every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub training_paths: TrainingPathService,
    pub login: LoginService,
    pub query_timeout: Duration,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, config: &AppConfig) -> Self {
        let timeout = config.database.query_timeout();
        Self {
            training_paths: TrainingPathService::new(store.clone(), timeout),
            login: LoginService::new(store.clone(), timeout),
            store,
            query_timeout: timeout,
        }
    }
}

/// Opens the configured backend. The memory backend is seeded from
/// `database.fixture_path` when set.
pub async fn connect_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, DatabaseError> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            let store = PgStore::new(pool);
            store.ensure_schema().await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on shutdown");
            let store = MemoryStore::new();
            if let Some(path) = &config.database.fixture_path {
                Fixture::load(path).await?.apply(&store).await?;
            }
            Ok(Arc::new(store))
        }
    }
}

pub fn router(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(login_routes())
        .merge(admin_routes())
        .merge(training_path_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        app = app.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }
    app
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<axum::http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
}

fn login_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public;

    Router::new().route("/login", post(public::standard_login))
}

fn admin_routes() -> Router<AppState> {
    use handlers::admin;

    Router::new().route("/admin", get(admin::admin_home))
}

fn training_path_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/api/training-paths", get(public::get_training_paths_without_katas))
        .route("/api/training-paths/grid", get(public::get_training_paths_for_grid))
        .route("/api/training-paths/topic/:topic", get(public::get_training_path_by_topic))
        .route(
            "/api/training-paths/:topic/katas",
            get(public::get_katas_of_training_path_by_topic),
        )
        .route(
            "/api/katas/training-path/:id",
            get(public::get_katas_by_training_path_id),
        )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Training Paths API",
            "version": version,
            "endpoints": {
                "login": "POST /login",
                "admin": "GET /admin",
                "training_paths": "GET /api/training-paths[/grid]",
                "by_topic": "GET /api/training-paths/topic/:topic",
                "katas_by_topic": "GET /api/training-paths/:topic/katas",
                "katas_by_id": "GET /api/katas/training-path/:id",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match store_call("health", state.query_timeout, state.store.ping()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}

/// Binds and serves until the process is stopped
pub async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    let store = connect_store(config).await?;
    let app = router(AppState::new(store, config), config);

    let bind_addr = format!("{}:{}", config.server.bind_host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Training Paths API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

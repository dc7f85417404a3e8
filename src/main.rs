//! Course Portal Backend
//!
//! REST backend for a professor's course portal: subjects and materials, post feeds, a student
//! message board, static internship information and an AI tutor backed by Gemini.

mod api;
mod assistant;
mod auth;
mod config;
mod content;
mod db;
mod errors;
mod models;
mod portal;
mod views;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assistant::{system_instruction, AssistantService, GeminiBackend};
use auth::AdminGate;
use config::{Config, LogFormat, StorageBackend};
use db::{MemoryMirror, MirrorStore, SqliteMirror};
use portal::PortalStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub portal: Arc<PortalStore>,
    pub admin: Arc<AdminGate>,
    pub assistant: Arc<AssistantService>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!("Starting {} portal backend", content::PORTAL_NAME);
    tracing::info!("Storage: {:?}", config.storage);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin.is_none() {
        tracing::warn!(
            "No admin credentials configured (PORTAL_ADMIN_EMAIL / PORTAL_ADMIN_PASSWORD). Editing is disabled!"
        );
    }
    if config.assistant.api_key.is_none() {
        tracing::warn!("No GEMINI_API_KEY configured. The tutor will answer with its fallback message.");
    }

    // Initialize the mirror store
    let mirror: Arc<dyn MirrorStore> = match &config.storage {
        StorageBackend::Sqlite(path) => {
            let pool = db::init_database(path).await?;
            Arc::new(SqliteMirror::new(pool))
        }
        StorageBackend::Memory => Arc::new(MemoryMirror::new()),
    };
    let portal = Arc::new(PortalStore::open(mirror).await?);

    // Initialize the tutor
    let instruction = match &config.assistant.instruction_path {
        Some(path) => {
            tracing::info!("Loading assistant instruction from {:?}", path);
            tokio::fs::read_to_string(path).await?
        }
        None => system_instruction(config.assistant.professor_contact.as_deref()),
    };
    let backend = Arc::new(GeminiBackend::new(&config.assistant));
    let assistant = Arc::new(AssistantService::new(backend, instruction));

    // Create application state
    let state = AppState {
        portal,
        admin: Arc::new(AdminGate::new(config.admin.clone())),
        assistant,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes
    let public_routes = Router::new()
        .route("/menu", get(api::get_menu))
        .route("/pages/{page}", get(api::get_page))
        .route("/navigate", post(api::navigate))
        // Admin session
        .route("/admin/login", post(api::login))
        .route("/admin/status", get(api::admin_status))
        // Read-only content
        .route("/posts", get(api::list_posts))
        .route("/subjects", get(api::list_subjects))
        .route("/subjects/{id}", get(api::get_subject))
        // Message board
        .route("/board/messages", get(api::list_board_messages))
        .route("/board/messages", post(api::send_board_message))
        // Tutor
        .route("/assistant/sessions", post(api::open_conversation))
        .route("/assistant/sessions/{id}", get(api::get_conversation))
        .route("/assistant/sessions/{id}", delete(api::close_conversation))
        .route("/assistant/sessions/{id}/messages", post(api::ask_assistant));

    // Editing routes
    let admin_routes = Router::new()
        .route("/admin/logout", post(api::logout))
        .route("/posts", post(api::create_post))
        .route("/posts/{id}", delete(api::delete_post))
        .route("/subjects", post(api::create_subject))
        .route("/subjects/{id}/materials", post(api::add_material))
        .route(
            "/subjects/{id}/materials/{material_id}",
            delete(api::delete_material),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.merge(admin_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

use std::panic;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use jamroom::config::Config;
use jamroom::docs::ApiDoc;
use jamroom::routes::api::create_api_routes;
use jamroom::state::AppState;
use jamroom::store::{DbStore, MemoryStore, RoomStore};
use jamroom::ws::channels::ChannelRegistry;

#[tokio::main]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            // Default to info level, but allow debug for our app
            "jamroom=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    // Pick the store: PostgreSQL when configured, in-memory otherwise
    let store = match &config.db_url {
        Some(db_url) => match DbStore::connect(db_url).await {
            Ok(db) => {
                info!("Database initialized successfully");
                RoomStore::Db(db)
            }
            Err(e) => {
                error!("Failed to initialize database: {}", e);
                warn!("Falling back to the in-memory store; rooms will not survive a restart");
                RoomStore::Memory(MemoryStore::new())
            }
        },
        None => {
            warn!("No database URL configured - rooms will not survive a restart");
            RoomStore::Memory(MemoryStore::new())
        }
    };

    // Reopen a channel for every persisted room so channels and stored rooms
    // stay in lock-step across restarts
    let channels = ChannelRegistry::new();
    match store.list_rooms().await {
        Ok(rooms) => {
            for room in &rooms {
                channels.open(room).await;
            }
            if !rooms.is_empty() {
                info!("Reopened channels for {} persisted rooms", rooms.len());
            }
        }
        Err(e) => error!("Failed to list persisted rooms: {}", e),
    }

    let state = Arc::new(AppState { store, channels });

    // Combine all routes
    let app_routes = Router::new()
        .merge(create_api_routes(state))
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(&config))
        // Add tracing layer
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.server_address())
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", config.server_address()));

    info!("Server running on http://{}", config.server_address());
    info!(
        "Swagger UI available at http://{}/swagger",
        config.server_address()
    );

    axum::serve(listener, app_routes)
        .await
        .expect("Server failed to start");
}

fn cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    }
}

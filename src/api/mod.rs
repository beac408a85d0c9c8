use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::{Mutex, watch};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::client::AgentClient;
use crate::lifecycle::SearchLifecycle;
use crate::poller::{BackendHealth, StatusPoller};

pub mod handlers;
pub mod models;

/// Shared state behind every handler. One lifecycle per server, this is a
/// single-user tool; the watch receiver always holds the latest poll.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<Mutex<SearchLifecycle>>,
    pub client: AgentClient,
    pub health: watch::Receiver<BackendHealth>,
}

impl AppState {
    pub fn new(client: AgentClient, health: watch::Receiver<BackendHealth>) -> AppState {
        AppState {
            lifecycle: Arc::new(Mutex::new(SearchLifecycle::new())),
            client,
            health,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Session event routes
        .route("/api/input", post(handlers::input_handler))
        .route("/api/key", post(handlers::key_handler))
        .route("/api/search", post(handlers::search_handler))
        // Read routes
        .route("/api/state", get(handlers::state_handler))
        .route("/api/status", get(handlers::status_handler))
        .with_state(state)
        // Static file serving for the UI
        .nest_service("/", ServeDir::new("static"))
        .layer(cors)
}

/// Runs the web front end until ctrl-c, polling the agent's health in the
/// background the whole time.
pub async fn serve(port: u16) -> anyhow::Result<()> {
    let client = AgentClient::new();
    let poller = StatusPoller::spawn(client.clone());
    let state = AppState::new(client, poller.subscribe());
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listen address")?;
    tracing::info!("lookout listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    poller.shutdown();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {}", e);
    }
}

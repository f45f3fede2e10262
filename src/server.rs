//! HTTP server
//!
//! Builds the axum router over the shared application state and runs it
//! until a shutdown signal arrives.

use std::sync::Arc;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::database::store::{GroupRequestStore, UserStore};
use crate::config::Settings;
use crate::handlers::{group_requests, health, sessions, users};
use crate::middleware::log_requests;
use crate::services::{JwtService, ServiceFactory};
use crate::utils::errors::Result;

/// Shared state for web handlers
#[derive(Clone)]
pub struct AppState {
    pub services: ServiceFactory,
    pub store: Arc<dyn GroupRequestStore>,
}

impl AppState {
    pub fn new<S>(settings: &Settings, store: Arc<S>) -> Self
    where
        S: GroupRequestStore + UserStore + 'static,
    {
        Self {
            services: ServiceFactory::new(settings, store.clone()),
            store,
        }
    }
}

impl FromRef<AppState> for JwtService {
    fn from_ref(state: &AppState) -> Self {
        state.services.jwt_service.clone()
    }
}

/// Create the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/users", post(users::store))
        .route("/sessions", post(sessions::store))
        .route(
            "/groups/:group_id/requests",
            get(group_requests::index).post(group_requests::store),
        )
        .route(
            "/groups/:group_id/requests/:request_id",
            axum::routing::delete(group_requests::destroy),
        )
        .route(
            "/groups/:group_id/requests/:request_id/accept",
            post(group_requests::accept),
        )
        .layer(axum::middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the configured address and serve until Ctrl+C
pub async fn serve(settings: &Settings, state: AppState) -> Result<()> {
    let address = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("HTTP server listening on {}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

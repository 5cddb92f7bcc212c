//! Application startup and lifecycle management.
//!
//! Builds the router, wires the provider clients into shared state, and
//! manages the bind/serve lifecycle (port 0 binds a random port for tests).

use crate::config::RelayConfig;
use crate::error::AppError;
use crate::handlers::generate::generate;
use crate::handlers::health::{health_check, readiness_check};
use crate::handlers::lookup::lookup;
use crate::handlers::metrics::metrics;
use crate::middleware::metrics::metrics_middleware;
use crate::services::providers::{
    GeminiTextProvider, LookupProvider, TextProvider, WikipediaClient,
};
use axum::{
    http::{Method, StatusCode},
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: RelayConfig,
    pub text_provider: Arc<dyn TextProvider>,
    pub lookup_provider: Arc<dyn LookupProvider>,
}

/// JSON fallback for unmatched routes.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/gemini", post(generate))
        .route("/api/wikipedia", post(lookup))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics))
        .fallback(not_found)
        .layer(from_fn(metrics_middleware))
        // The relay is meant to be fetched from browser pages served anywhere.
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers(Any),
        )
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        if config.gemini.api_key.is_none() {
            tracing::warn!(
                "GOOGLE_API_KEY not set; /api/gemini will report a configuration error"
            );
        }

        let text_provider: Arc<dyn TextProvider> =
            Arc::new(GeminiTextProvider::new(config.gemini.clone()));
        tracing::info!(
            model = %config.gemini.model,
            "Initialized Gemini text provider"
        );

        let lookup_provider: Arc<dyn LookupProvider> =
            Arc::new(WikipediaClient::new(config.wikipedia.clone()));
        tracing::info!(
            endpoint = %config.wikipedia.api_url,
            "Initialized Wikipedia lookup client"
        );

        let state = AppState {
            config,
            text_provider,
            lookup_provider,
        };

        Self::with_state(state).await
    }

    /// Build with explicit state, used by tests to substitute mock providers.
    pub async fn with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal arrives.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let app = build_router(self.state);

        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

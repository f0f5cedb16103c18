//! HTTP server setup.
//!
//! # Responsibilities
//! - Create an Axum application whose only route is a fallback into the `Dispatcher`
//! - Wire up middleware (request ID, tracing, timeout)
//! - Enforce `max_concurrent_requests` via semaphore
//! - Bind server to listener and serve until shutdown
//! - Turn dispatch failures into 500 responses
//!
//! # Design Decisions
//! - Axum/hyper own sockets and HTTP parsing; routing happens entirely in
//!   the dispatcher, so Axum's own router is never consulted
//! - Failures of handlers and middleware surface here and nowhere else

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Semaphore;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::routing::Dispatcher;

/// Error type for serving.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Failed to bind to address.
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        source: std::io::Error,
    },

    /// Server loop failed.
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// State injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    /// Bounds concurrent dispatches (backpressure).
    pub limiter: Arc<Semaphore>,
}

/// HTTP server running a frozen `Dispatcher`.
pub struct HttpServer {
    app: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig, dispatcher: Dispatcher) -> Self {
        let app = Self::build_app(&config, dispatcher);
        Self { app, config }
    }

    /// Build the Axum application with all middleware layers.
    #[allow(deprecated)]
    fn build_app(config: &RouterConfig, dispatcher: Dispatcher) -> Router {
        let state = AppState {
            dispatcher,
            limiter: Arc::new(Semaphore::new(config.listener.max_concurrent_requests)),
        };

        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Bind the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServeError> {
        let address = self.config.listener.bind_address.clone();
        TcpListener::bind(&address)
            .await
            .map_err(|source| ServeError::Bind { address, source })
    }

    /// Run the server until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), ServeError> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run the server until `signal` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, listener: TcpListener, signal: F) -> Result<(), ServeError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.app.into_make_service_with_connect_info::<SocketAddr>())
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The Axum application, for in-process use without a socket.
    pub fn into_app(self) -> Router {
        self.app
    }
}

/// Serve `dispatcher` on `0.0.0.0:port` with default settings until Ctrl+C.
pub async fn serve(port: u16, dispatcher: Dispatcher) -> Result<(), ServeError> {
    let server = HttpServer::new(RouterConfig::with_port(port), dispatcher);
    let listener = server.bind().await?;
    server.run(listener).await
}

/// The single entry point from Axum into the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request) -> Response {
    let request_id = request_id(&request).unwrap_or("unknown").to_string();

    // Held until the response is produced.
    let _permit = match state.limiter.acquire().await {
        Ok(permit) => permit,
        Err(_) => return StatusCode::SERVICE_UNAVAILABLE.into_response(),
    };

    match state.dispatcher.dispatch(request).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Dispatch failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

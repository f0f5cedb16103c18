//! Demo server for the segment router.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ axum/hyper ──▶ http::server ──▶ routing::Dispatcher
//!                                                        │
//!                                    ┌───────────────────┴──────────────────┐
//!                                    ▼                                      ▼
//!                          middleware chain                          handler chain
//!                     (all matches, in order,               (first path + method match,
//!                      may short-circuit)                        else 404)
//!                                    │                                      │
//!     Client Response                └──────────────────┬───────────────────┘
//!     ◀──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use clap::Parser;
use serde_json::json;

use segment_router::config::{load_config, RouterConfig};
use segment_router::observability::{logging, metrics};
use segment_router::{Flow, HttpServer, PathPattern, Router};

#[derive(Parser)]
#[command(name = "segment-router")]
#[command(about = "Segment-pattern HTTP router demo server", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.set_port(port);
    }

    logging::init_logging(&config.observability)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "segment-router starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_concurrent_requests = config.listener.max_concurrent_requests,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let server = HttpServer::new(config, demo_routes()?.build());
    let listener = server.bind().await?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn demo_routes() -> Result<Router, segment_router::PatternError> {
    let router = Router::new()
        .use_middleware(PathPattern::parse("/**")?, |req, _params| async move {
            tracing::info!(method = %req.method(), path = %req.uri().path(), "Request");
            Ok(Flow::Continue(req))
        })
        .use_middleware(PathPattern::parse("/admin/**")?, |req, _params| async move {
            let authorized = req
                .headers()
                .get(header::AUTHORIZATION)
                .is_some_and(|value| value == "Bearer demo");
            if authorized {
                Ok(Flow::Continue(req))
            } else {
                Ok(Flow::Respond(StatusCode::UNAUTHORIZED.into_response()))
            }
        })
        .get(PathPattern::parse("/ping")?, |_req, _params| async { Ok("pong") })
        .get(PathPattern::parse("/users/:id")?, |_req, params| async move {
            Ok(axum::Json(json!({ "id": params.get("id") })))
        })
        .get(PathPattern::parse("/files/**")?, |req, _params| async move {
            Ok(req.uri().path().to_string())
        })
        .get(PathPattern::parse("/admin/status")?, |_req, _params| async {
            Ok(axum::Json(json!({ "status": "operational" })))
        });
    Ok(router)
}

//! Per-request dispatch.
//!
//! # State Machine
//! ```text
//! MatchingMiddleware ──(short-circuit)──────────────▶ Responded
//!        │
//!        ▼
//! MatchingHandler ──(first method + path match)─────▶ Responded
//!        │
//!        └──(no handler)────────────────────────────▶ NotFound (404)
//! ```
//!
//! # Design Decisions
//! - Middleware re-match against the *current* request, so a path rewrite
//!   changes which later middleware and handlers apply
//! - Handler/middleware failures are not recovered here; they are returned
//!   to the serving boundary as `DispatchError`
//! - No shared mutable state between requests

use std::sync::Arc;
use std::time::Instant;

use axum::http::{Method, StatusCode};
use thiserror::Error;

use super::handler::{BoxError, Flow, Request, Response};
use super::matcher::match_path;
use super::registry::Registry;
use crate::http::request::request_id;
use crate::observability::metrics;

/// A middleware or handler failed while dispatching.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("middleware `{pattern}` failed: {source}")]
    Middleware { pattern: String, source: BoxError },

    #[error("handler `{method} {pattern}` failed: {source}")]
    Handler {
        method: Method,
        pattern: String,
        source: BoxError,
    },
}

/// Terminal outcome of a dispatch, used for logs and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    ShortCircuit,
    NotFound,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Handled => "handled",
            Outcome::ShortCircuit => "short_circuit",
            Outcome::NotFound => "not_found",
            Outcome::Error => "error",
        }
    }
}

/// Runs the middleware chain and then the handler chain for each request.
///
/// Cheap to clone; all clones share the same frozen registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Dispatch a request to the registered middleware and handlers.
    pub async fn dispatch(&self, request: Request) -> Result<Response, DispatchError> {
        let start_time = Instant::now();
        let method = request.method().clone();
        let request_id = request_id(&request).unwrap_or("unknown").to_string();

        let result = self.run(request, &request_id).await;
        let outcome = match &result {
            Ok((outcome, _)) => *outcome,
            Err(_) => Outcome::Error,
        };
        metrics::record_dispatch(&method, outcome.as_str(), start_time);

        result.map(|(_, response)| response)
    }

    async fn run(
        &self,
        mut request: Request,
        request_id: &str,
    ) -> Result<(Outcome, Response), DispatchError> {
        for entry in self.registry.middleware() {
            let Some(params) = match_path(request.uri().path(), &entry.pattern) else {
                continue;
            };

            tracing::debug!(
                request_id = %request_id,
                path = %request.uri().path(),
                pattern = %entry.pattern,
                "Running middleware"
            );

            let flow = entry
                .middleware
                .call(request, params)
                .await
                .map_err(|source| DispatchError::Middleware {
                    pattern: entry.pattern.to_string(),
                    source,
                })?;

            match flow {
                Flow::Continue(next) => request = next,
                Flow::Respond(response) => {
                    tracing::debug!(
                        request_id = %request_id,
                        pattern = %entry.pattern,
                        status = %response.status(),
                        "Middleware short-circuited"
                    );
                    return Ok((Outcome::ShortCircuit, response));
                }
            }
        }

        let path = request.uri().path().to_string();
        for entry in self.registry.handlers() {
            if !entry.accepts(request.method()) {
                continue;
            }
            let Some(params) = match_path(&path, &entry.pattern) else {
                continue;
            };

            tracing::debug!(
                request_id = %request_id,
                method = %entry.method,
                path = %path,
                pattern = %entry.pattern,
                "Handler matched"
            );

            let response = entry
                .handler
                .call(request, params)
                .await
                .map_err(|source| DispatchError::Handler {
                    method: entry.method.clone(),
                    pattern: entry.pattern.to_string(),
                    source,
                })?;
            return Ok((Outcome::Handled, response));
        }

        tracing::debug!(request_id = %request_id, path = %path, "No handler matched");
        Ok((Outcome::NotFound, not_found()))
    }
}

/// 404 with an empty body.
pub fn not_found() -> Response {
    let mut response = Response::default();
    *response.status_mut() = StatusCode::NOT_FOUND;
    response
}

//! Route registration.
//!
//! # Responsibilities
//! - One registration call per HTTP method, plus `use_middleware`
//! - Append entries to the registry in call order
//! - Freeze the registry into a `Dispatcher`
//!
//! # Design Decisions
//! - Builder by value: each call takes ownership and returns the `Router`
//! - Patterns arrive already validated (`PathPattern`), so registration
//!   itself cannot fail
//! - Order of calls is the order of precedence at dispatch time

use std::future::Future;

use axum::http::Method;
use axum::response::IntoResponse;

use super::dispatcher::Dispatcher;
use super::handler::{BoxError, Handler, Middleware, MiddlewareResult, Request};
use super::matcher::Params;
use super::pattern::PathPattern;
use super::registry::{HandlerEntry, MiddlewareEntry, Registry};
use crate::http::server::{serve, ServeError};

/// Registration API for handlers and middleware.
#[derive(Debug, Default)]
pub struct Router {
    registry: Registry,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<F, Fut, R>(self, pattern: PathPattern, handler: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(Method::GET, pattern, handler)
    }

    pub fn post<F, Fut, R>(self, pattern: PathPattern, handler: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(Method::POST, pattern, handler)
    }

    pub fn put<F, Fut, R>(self, pattern: PathPattern, handler: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(Method::PUT, pattern, handler)
    }

    pub fn delete<F, Fut, R>(self, pattern: PathPattern, handler: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(Method::DELETE, pattern, handler)
    }

    pub fn options<F, Fut, R>(self, pattern: PathPattern, handler: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(Method::OPTIONS, pattern, handler)
    }

    pub fn patch<F, Fut, R>(self, pattern: PathPattern, handler: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(Method::PATCH, pattern, handler)
    }

    pub fn head<F, Fut, R>(self, pattern: PathPattern, handler: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
        R: IntoResponse + 'static,
    {
        self.route(Method::HEAD, pattern, handler)
    }

    /// Register a handler for an arbitrary method.
    pub fn route<H: Handler>(mut self, method: Method, pattern: PathPattern, handler: H) -> Self {
        tracing::debug!(method = %method, pattern = %pattern, "Registering handler");
        self.registry.push_handler(HandlerEntry {
            method,
            pattern,
            handler: Box::new(handler),
        });
        self
    }

    /// Register a middleware. Runs for every request whose path matches
    /// `pattern`, in registration order, before any handler.
    pub fn use_middleware<F, Fut>(self, pattern: PathPattern, middleware: F) -> Self
    where
        F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MiddlewareResult> + Send + 'static,
    {
        self.layer(pattern, middleware)
    }

    /// Register any [`Middleware`] implementation.
    pub fn layer<M: Middleware>(mut self, pattern: PathPattern, middleware: M) -> Self {
        tracing::debug!(pattern = %pattern, "Registering middleware");
        self.registry.push_middleware(MiddlewareEntry {
            pattern,
            middleware: Box::new(middleware),
        });
        self
    }

    /// Freeze the registry. No entries can be added afterwards.
    pub fn build(self) -> Dispatcher {
        tracing::info!(
            middleware = self.registry.middleware().len(),
            handlers = self.registry.handlers().len(),
            "Router built"
        );
        Dispatcher::new(self.registry)
    }

    /// Build and serve on `0.0.0.0:port` until shutdown.
    pub async fn listen(self, port: u16) -> Result<(), ServeError> {
        serve(port, self.build()).await
    }
}

//! Handler and middleware function contracts.
//!
//! Both are stored as trait objects in the registry. Any
//! `Fn(Request, Params) -> impl Future` closure or `async fn` with the right
//! output implements the matching trait through a blanket impl.

use std::future::Future;

use axum::response::IntoResponse;
use futures_util::future::BoxFuture;

use super::matcher::Params;

pub use axum::extract::Request;
pub use axum::response::Response;

/// Opaque error produced by a failing handler or middleware.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a handler invocation.
pub type HandlerResult = Result<Response, BoxError>;

/// Result of a middleware invocation.
pub type MiddlewareResult = Result<Flow, BoxError>;

/// What a middleware decided to do with the request.
#[derive(Debug)]
pub enum Flow {
    /// Continue the chain with this (possibly replaced) request.
    Continue(Request),
    /// Stop dispatching and answer with this response.
    Respond(Response),
}

impl From<Request> for Flow {
    fn from(request: Request) -> Self {
        Flow::Continue(request)
    }
}

impl From<Response> for Flow {
    fn from(response: Response) -> Self {
        Flow::Respond(response)
    }
}

/// A request handler.
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request, params: Params) -> BoxFuture<'static, HandlerResult>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, BoxError>> + Send + 'static,
    R: IntoResponse + 'static,
{
    fn call(&self, request: Request, params: Params) -> BoxFuture<'static, HandlerResult> {
        let fut = (self)(request, params);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}

/// A middleware function.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, request: Request, params: Params) -> BoxFuture<'static, MiddlewareResult>;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MiddlewareResult> + Send + 'static,
{
    fn call(&self, request: Request, params: Params) -> BoxFuture<'static, MiddlewareResult> {
        Box::pin((self)(request, params))
    }
}

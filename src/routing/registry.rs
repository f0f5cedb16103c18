//! Frozen route registry.
//!
//! # Responsibilities
//! - Hold middleware and handler entries in registration order
//! - Expose read-only iteration for the dispatcher
//!
//! # Design Decisions
//! - Append-only while the `Router` builder owns it
//! - Shared behind `Arc` once built; never mutated afterwards (no locks)

use std::fmt;

use axum::http::Method;

use super::handler::{Handler, Middleware};
use super::pattern::PathPattern;

/// A registered handler: method, pattern and function.
pub struct HandlerEntry {
    pub method: Method,
    pub pattern: PathPattern,
    pub handler: Box<dyn Handler>,
}

impl HandlerEntry {
    /// Case-insensitive method comparison.
    pub fn accepts(&self, method: &Method) -> bool {
        self.method.as_str().eq_ignore_ascii_case(method.as_str())
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern.to_string())
            .finish_non_exhaustive()
    }
}

/// A registered middleware: pattern and function.
pub struct MiddlewareEntry {
    pub pattern: PathPattern,
    pub middleware: Box<dyn Middleware>,
}

impl fmt::Debug for MiddlewareEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareEntry")
            .field("pattern", &self.pattern.to_string())
            .finish_non_exhaustive()
    }
}

/// Ordered middleware and handler lists.
#[derive(Debug, Default)]
pub struct Registry {
    middleware: Vec<MiddlewareEntry>,
    handlers: Vec<HandlerEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_handler(&mut self, entry: HandlerEntry) {
        self.handlers.push(entry);
    }

    pub(crate) fn push_middleware(&mut self, entry: MiddlewareEntry) {
        self.middleware.push(entry);
    }

    /// Middleware in registration order.
    pub fn middleware(&self) -> &[MiddlewareEntry] {
        &self.middleware
    }

    /// Handlers in registration order.
    pub fn handlers(&self) -> &[HandlerEntry] {
        &self.handlers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::handler::{BoxError, Request, Response};
    use crate::routing::matcher::Params;

    async fn noop(_req: Request, _params: Params) -> Result<Response, BoxError> {
        Ok(Response::default())
    }

    #[test]
    fn test_method_match_is_case_insensitive() {
        let entry = HandlerEntry {
            method: Method::from_bytes(b"get").unwrap(),
            pattern: PathPattern::root(),
            handler: Box::new(noop),
        };
        assert!(entry.accepts(&Method::GET));
        assert!(!entry.accepts(&Method::POST));
    }

    #[test]
    fn test_preserves_insertion_order() {
        let mut registry = Registry::new();
        for path in ["/a", "/b", "/c"] {
            registry.push_handler(HandlerEntry {
                method: Method::GET,
                pattern: PathPattern::parse(path).unwrap(),
                handler: Box::new(noop),
            });
        }
        let order: Vec<String> = registry
            .handlers()
            .iter()
            .map(|entry| entry.pattern.to_string())
            .collect();
        assert_eq!(order, vec!["/a", "/b", "/c"]);
        assert!(registry.middleware().is_empty());
    }
}

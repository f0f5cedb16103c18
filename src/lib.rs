//! Segment-pattern HTTP request router.
//!
//! Handlers and middleware are registered against path patterns built from
//! literal segments (`/users`), named parameters (`:id`), single-segment
//! wildcards (`*`) and a terminal multi-segment wildcard (`**`). Each request
//! runs every matching middleware in registration order, then the first
//! handler whose pattern and method match.
//!
//! ```no_run
//! use segment_router::{Flow, PathPattern, Router};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! Router::new()
//!     .use_middleware(PathPattern::parse("/**")?, |req, _params| async move {
//!         Ok(Flow::Continue(req))
//!     })
//!     .get(PathPattern::new(["/users", ":id"])?, |_req, params| async move {
//!         Ok(format!("user {}", params.get("id").unwrap_or_default()))
//!     })
//!     .listen(8080)
//!     .await?;
//! # Ok(())
//! # }
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod observability;

pub use config::RouterConfig;
pub use http::{serve, HttpServer, ServeError};
pub use routing::{
    BoxError, DispatchError, Dispatcher, Flow, Params, PathPattern, PatternError, Request,
    Response, Router, Segment,
};

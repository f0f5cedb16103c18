//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Setup (once):
//!     Router::get/post/.../use_middleware(PathPattern, fn)
//!     → registry.rs (append in call order)
//!     → Router::build() freezes into Dispatcher (Arc<Registry>)
//!
//! Per request:
//!     dispatcher.rs
//!     → for each middleware: matcher.rs (path vs pattern) → run → continue | respond
//!     → for each handler: method + matcher.rs → run first match
//!     → 404 if nothing matched
//! ```
//!
//! # Design Decisions
//! - Registry immutable at runtime (thread-safe without locks)
//! - No regex in hot path (segment comparison only)
//! - Deterministic: first registered handler wins

pub mod dispatcher;
pub mod handler;
pub mod matcher;
pub mod pattern;
pub mod registry;
pub mod router;

pub use dispatcher::{DispatchError, Dispatcher};
pub use handler::{BoxError, Flow, Handler, Middleware, Request, Response};
pub use matcher::{match_path, Params};
pub use pattern::{PathPattern, PatternError, Segment};
pub use router::Router;

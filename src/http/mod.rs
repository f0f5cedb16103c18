//! HTTP serving boundary.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum/hyper: accept, parse, layers)
//!     → request.rs (assign x-request-id)
//!     → routing::Dispatcher (middleware chain, handler chain)
//!     → server.rs (map DispatchError to 500)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{request_id, X_REQUEST_ID};
pub use server::{serve, HttpServer, ServeError};

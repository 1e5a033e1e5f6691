//! Middleware layer.
//!
//! Middleware wraps a handler to add behaviour around it. Every middleware is
//! a function from the next handler in the chain to a new handler:
//!
//! ```text
//! wrap(next) ──▶ handler that does its own work and calls next
//! ```
//!
//! Register middleware on the router with [`Router::layer`](crate::Router::layer).
//! The first registered middleware runs outermost:
//!
//! ```rust,no_run
//! use resplog::{Router, Server, middleware};
//!
//! # async fn run(app: Router) {
//! let app = app
//!     .layer(middleware::log_request())   // status + latency
//!     .layer(middleware::log_response()); // raw body bytes
//!
//! Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! # }
//! ```
//!
//! Built-in middleware:
//! - [`log_request`]: one line when a request starts, one with status and
//!   latency when it completes
//! - [`log_response`]: every body write, verbatim

mod log_request;
mod log_response;

pub use log_request::{log_request, LogRequest};
pub use log_response::{log_response, LogResponse, LoggingWriter};

use crate::handler::BoxedHandler;

/// A handler-to-handler transformation.
///
/// `wrap` is called once, when the server builds its handler chain. The
/// handler it returns is then called for every request.
pub trait Middleware: Send + Sync + 'static {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler;
}

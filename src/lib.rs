//! # resplog
//!
//! A minimal HTTP framework whose response path is a plain byte sink, so
//! middleware can watch exactly what a handler sends.
//!
//! ## The idea
//!
//! Handlers return a [`Response`]. The framework plays it into a
//! [`ResponseWriter`] that belongs to the request. Middleware runs before the
//! handler and may put its own writer in front of the real one. The built-in
//! [`middleware::log_response`] does exactly that: every write is logged
//! verbatim under the request's tracing span, then forwarded untouched.
//!
//! What resplog covers:
//!
//! - Radix-tree routing: O(path-length) lookup via [`matchit`]
//! - Handler-wraps-handler middleware: [`middleware::Middleware`]
//! - Per-request logging context: a `tracing` span per request, no globals
//! - Graceful shutdown: SIGTERM / Ctrl-C, drains in-flight requests
//!
//! Log output goes wherever your `tracing` subscriber sends it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use resplog::{Method, Request, Response, Router, Server, StatusCode, middleware};
//!
//! #[tokio::main]
//! async fn main() {
//!     tracing_subscriber::fmt::init();
//!
//!     let app = Router::new()
//!         .on(Method::GET,  "/users/{id}", get_user)
//!         .on(Method::POST, "/users",      create_user)
//!         .layer(middleware::log_request())
//!         .layer(middleware::log_response());
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     if req.body().is_empty() {
//!         return Response::status(StatusCode::BAD_REQUEST);
//!     }
//!     Response::builder()
//!         .status(StatusCode::CREATED)
//!         .header("location", "/users/99")
//!         .json(br#"{"id":"99"}"#.to_vec())
//! }
//! ```
//!
//! A `GET /users/42` through that router logs, under `request{id=1 method=GET path=/users/42}`:
//!
//! ```text
//! INFO started method=GET path=/users/42
//! INFO response body={"id":"42"}
//! INFO completed status=200 latency_ms=0.05
//! ```

mod context;
mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;
mod writer;

pub mod middleware;

#[cfg(test)]
mod testing;

pub use http::{Method, StatusCode};

pub use context::Context;
pub use error::Error;
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use writer::{BufferedWriter, ResponseWriter};

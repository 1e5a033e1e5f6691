//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router itself is the
//! innermost link of the handler chain: middleware registered with
//! [`Router::layer`] wraps it as a whole, so every request, matched or
//! not, passes through the middleware.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler};
use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::Response;
use crate::writer::ResponseWriter;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each [`Router::on`] and [`Router::layer`] call returns `self` so
/// registrations chain naturally.
pub struct Router {
    routes: Routes,
    middleware: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Routes(HashMap::new()), middleware: Vec::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use resplog::{Method, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::GET,  "/users/{id}", get_user)
    ///     .on(Method::POST, "/users",      create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes.0
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Wrap every route (and the 404 fallback) in `middleware`.
    ///
    /// Middleware registered first runs first, around everything registered
    /// after it.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Builds the full handler chain: middleware around the route table.
    pub(crate) fn into_handler(self) -> BoxedHandler {
        let endpoint: BoxedHandler = Arc::new(self.routes);
        self.middleware.iter().rev().fold(endpoint, |next, m| m.wrap(next))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// The route table as a handler: look the request up, fill in its path
/// params, and hand it to the matching route. Unmatched requests get `404`.
struct Routes(HashMap<Method, MatchitRouter<BoxedHandler>>);

impl Routes {
    fn lookup(&self, method: &Method, path: &str) -> Option<(&BoxedHandler, HashMap<String, String>)> {
        let matched = self.0.get(method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value, params))
    }
}

impl ErasedHandler for Routes {
    fn call<'a>(&'a self, mut req: Request, writer: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        match self.lookup(req.method(), req.path()) {
            Some((handler, params)) => {
                req.params = params;
                handler.call(req, writer)
            }
            None => Box::pin(async move { Response::status(StatusCode::NOT_FOUND).write_to(writer) }),
        }
    }
}

//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The router and the middleware chain hold handlers of *different* types, so
//! every handler is erased behind one trait object, [`ErasedHandler`]. An
//! erased handler takes the request plus the response sink it must write into
//! and resolves once the response has been written:
//!
//! ```text
//! async fn hello(req: Request) -> Response { … }   ← user writes this
//!        ↓ router.on(Method::GET, "/", hello)
//! hello.into_boxed_handler()                       ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(hello))                       ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req, writer)  at request time       ← one vtable dispatch
//!        ↓
//! hello(req).await.into_response().write_to(writer)
//! ```
//!
//! Middleware sits between the server and the handler as one more
//! `ErasedHandler` that calls the next one, possibly with a different
//! writer. See [`Middleware`](crate::middleware::Middleware).

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::IntoResponse;
use crate::writer::ResponseWriter;

// ── Erased types ──────────────────────────────────────────────────────────────

/// A heap-allocated, type-erased future that finishes writing one response.
///
/// It borrows the response writer for `'a`, so it cannot outlive the
/// request it belongs to.
pub type BoxFuture<'a> = Pin<Box<dyn Future<Output = io::Result<()>> + Send + 'a>>;

/// One link in the handler chain.
///
/// Implement this for middleware handlers. Route handlers get it for free via
/// [`Handler`]. The returned error is whatever the response writer reported;
/// application failures belong in the response itself.
pub trait ErasedHandler {
    fn call<'a>(&'a self, req: Request, writer: &'a mut dyn ResponseWriter) -> BoxFuture<'a>;
}

/// A heap-allocated, type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is automatically satisfied for any
/// `async fn` with the signature:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// The trait is **sealed**: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// ── Blanket implementations ───────────────────────────────────────────────────

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

// ── Concrete wrapper ──────────────────────────────────────────────────────────

/// Bridges a typed `async fn` to [`ErasedHandler`]: run it, then write the
/// response it produced into the sink.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call<'a>(&'a self, req: Request, writer: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response().write_to(writer) })
    }
}

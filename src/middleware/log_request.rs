//! Request logging: what came in, what status went out, how long it took.
//!
//! Body bytes are left to [`log_response`](super::log_response). Nothing is
//! aggregated; every request produces its own pair of lines.

use std::sync::Arc;
use std::time::Instant;

use super::Middleware;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;
use crate::writer::ResponseWriter;

/// Middleware that logs `started` before the next handler runs and
/// `completed` (status, latency) after it returns.
///
/// The status is read back from the response writer, so this works no matter
/// which inner handler or middleware set it. If the chain fails, `failed` is
/// logged instead and the error is passed up unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogRequest {
    _priv: (),
}

/// Creates the request-logging middleware.
pub fn log_request() -> LogRequest {
    LogRequest::default()
}

impl Middleware for LogRequest {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(LogRequestHandler { next })
    }
}

struct LogRequestHandler {
    next: BoxedHandler,
}

impl ErasedHandler for LogRequestHandler {
    fn call<'a>(&'a self, req: Request, writer: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        let span = req.context().span().clone();
        tracing::info!(parent: &span, method = %req.method(), path = req.path(), "started");

        Box::pin(async move {
            let start = Instant::now();
            let result = self.next.call(req, &mut *writer).await;
            let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

            match &result {
                Ok(()) => tracing::info!(parent: &span, status = writer.status(), latency_ms, "completed"),
                Err(e) => tracing::error!(parent: &span, error = %e, latency_ms, "failed"),
            }
            result
        })
    }
}

//! Per-request logging context.

use http::Method;
use tracing::Span;

/// The logging handle for one request.
///
/// The server creates one per request and hands it to the handler chain
/// inside the [`Request`](crate::Request). Anything that wants its log lines
/// to belong to the request emits them under [`span`](Context::span). There
/// is no process-wide logger to reach for.
#[derive(Clone, Debug)]
pub struct Context {
    id: u64,
    span: Span,
}

impl Context {
    pub(crate) fn new(id: u64, method: &Method, path: &str) -> Self {
        let span = tracing::info_span!("request", id, method = %method, path = %path);
        Self { id, span }
    }

    #[cfg(test)]
    pub(crate) fn detached(id: u64) -> Self {
        Self { id, span: tracing::info_span!("request", id) }
    }

    /// Server-assigned request number, unique per [`Server`](crate::Server).
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn span(&self) -> &Span {
        &self.span
    }
}

//! Response-body logging.
//!
//! Logs the raw bytes of every response write, as text, under the request's
//! span. Status and latency are not logged here; pair it with
//! [`log_request`](super::log_request) for those.

use std::io::{self, Write};
use std::sync::Arc;

use tracing::Span;

use super::Middleware;
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler};
use crate::request::Request;
use crate::writer::ResponseWriter;

// ── LoggingWriter ─────────────────────────────────────────────────────────────

/// A [`ResponseWriter`] that logs each write before passing it on.
///
/// Each `write` emits one `INFO` event with message `response` and the buffer
/// (lossily decoded as UTF-8) in the `body` field, then forwards the same
/// buffer to the inner writer and returns its result untouched. Nothing is
/// buffered or retried here. All other methods go straight to the inner
/// writer.
pub struct LoggingWriter<W> {
    inner: W,
    span: Span,
}

impl<W: ResponseWriter> LoggingWriter<W> {
    pub fn new(inner: W, span: Span) -> Self {
        Self { inner, span }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: ResponseWriter> Write for LoggingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        tracing::info!(parent: &self.span, body = %String::from_utf8_lossy(buf), "response");
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<W: ResponseWriter> ResponseWriter for LoggingWriter<W> {
    fn status(&self) -> u16 {
        self.inner.status()
    }

    fn set_status(&mut self, status: u16) {
        self.inner.set_status(status)
    }

    fn append_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        self.inner.append_header(name, value)
    }
}

// ── Middleware ────────────────────────────────────────────────────────────────

/// Middleware that swaps each request's writer for a [`LoggingWriter`].
///
/// Build it with [`log_response()`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LogResponse {
    _priv: (),
}

/// Creates the response-logging middleware.
pub fn log_response() -> LogResponse {
    LogResponse::default()
}

impl Middleware for LogResponse {
    fn wrap(&self, next: BoxedHandler) -> BoxedHandler {
        Arc::new(LogResponseHandler { next })
    }
}

struct LogResponseHandler {
    next: BoxedHandler,
}

impl ErasedHandler for LogResponseHandler {
    fn call<'a>(&'a self, req: Request, writer: &'a mut dyn ResponseWriter) -> BoxFuture<'a> {
        let mut writer = LoggingWriter::new(writer, req.context().span().clone());
        Box::pin(async move { self.next.call(req, &mut writer).await })
    }
}

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use super::*;
    use crate::handler::Handler;
    use crate::response::Response;
    use crate::testing;
    use crate::writer::BufferedWriter;

    /// Fails the `fail_on`-th write (1-based) and accepts only `limit` bytes
    /// of any other write.
    struct FlakyWriter {
        inner: BufferedWriter,
        writes: usize,
        fail_on: usize,
        limit: usize,
    }

    impl FlakyWriter {
        fn new(fail_on: usize, limit: usize) -> Self {
            Self { inner: BufferedWriter::new(), writes: 0, fail_on, limit }
        }
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            if self.writes == self.fail_on {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "peer went away"));
            }
            let n = buf.len().min(self.limit);
            self.inner.write(&buf[..n])
        }

        fn flush(&mut self) -> io::Result<()> { self.inner.flush() }
    }

    impl ResponseWriter for FlakyWriter {
        fn status(&self) -> u16 { self.inner.status() }
        fn set_status(&mut self, status: u16) { self.inner.set_status(status) }
        fn append_header(&mut self, name: &str, value: &str) -> io::Result<()> {
            self.inner.append_header(name, value)
        }
    }

    #[test]
    fn single_write_is_logged_and_forwarded() {
        let (logs, _guard) = testing::capture();
        let mut w = LoggingWriter::new(BufferedWriter::new(), tracing::info_span!("request", id = 1u64));

        assert_eq!(w.write(b"OK").unwrap(), 2);

        let records = logs.with_message("response");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("body"), Some("OK"));
        assert_eq!(w.into_inner().body(), b"OK");
    }

    #[test]
    fn each_write_gets_its_own_record_in_order() {
        let (logs, _guard) = testing::capture();
        let mut w = LoggingWriter::new(BufferedWriter::new(), tracing::info_span!("request", id = 1u64));

        w.write(b"ab").unwrap();
        w.write(b"cd").unwrap();

        let bodies: Vec<_> = logs.with_message("response").iter()
            .map(|r| r.field("body").unwrap_or_default().to_owned())
            .collect();
        assert_eq!(bodies, ["ab", "cd"]);
        assert_eq!(w.into_inner().body(), b"abcd");
    }

    #[test]
    fn records_belong_to_the_request_span() {
        let (logs, _guard) = testing::capture();
        let span = tracing::info_span!("request", id = 7u64);
        let mut w = LoggingWriter::new(BufferedWriter::new(), span);

        w.write(b"x").unwrap();

        let record = &logs.with_message("response")[0];
        assert_eq!(record.span.as_deref(), Some("request"));
        assert_eq!(record.span_field("id"), Some("7"));
    }

    #[test]
    fn inner_error_and_short_counts_pass_through() {
        let (logs, _guard) = testing::capture();
        let mut w = LoggingWriter::new(FlakyWriter::new(2, 3), Span::none());

        assert_eq!(w.write(b"hello").unwrap(), 3);
        let err = w.write(b"world").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(err.to_string(), "peer went away");
        assert_eq!(w.write(b"again").unwrap(), 3);

        // the failed write was still logged, and nothing was retried
        let bodies: Vec<_> = logs.with_message("response").iter()
            .map(|r| r.field("body").unwrap_or_default().to_owned())
            .collect();
        assert_eq!(bodies, ["hello", "world", "again"]);
        assert_eq!(w.into_inner().inner.body(), b"helaga");
    }

    #[test]
    fn non_utf8_bytes_are_rendered_lossily() {
        let (logs, _guard) = testing::capture();
        let mut w = LoggingWriter::new(BufferedWriter::new(), Span::none());

        w.write(&[b'o', 0xff, b'k']).unwrap();

        assert_eq!(logs.with_message("response")[0].field("body"), Some("o\u{fffd}k"));
        assert_eq!(w.into_inner().body(), &[b'o', 0xff, b'k']);
    }

    #[test]
    fn status_and_headers_are_delegated() {
        let (logs, _guard) = testing::capture();
        let mut w = LoggingWriter::new(BufferedWriter::new(), Span::none());

        w.set_status(418);
        w.append_header("x-teapot", "yes").unwrap();
        w.flush().unwrap();

        assert!(logs.with_message("response").is_empty());
        let inner = w.into_inner();
        assert_eq!(inner.status(), 418);
        assert_eq!(inner.headers()["x-teapot"], "yes");
    }

    #[tokio::test]
    async fn middleware_logs_and_calls_next() {
        let (logs, _guard) = testing::capture();
        let handler = log_response().wrap((|_req: Request| async { "OK" }).into_boxed_handler());
        let mut writer = BufferedWriter::new();

        handler.call(Request::test(Method::GET, "/"), &mut writer).await.unwrap();

        let records = logs.with_message("response");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field("body"), Some("OK"));
        assert_eq!(records[0].span_field("id"), Some("1"));
        assert_eq!(writer.body(), b"OK");
    }

    #[tokio::test]
    async fn response_is_unchanged_by_the_middleware() {
        async fn handler(_req: Request) -> Response {
            Response::builder().status(StatusCode::ACCEPTED).header("x-a", "1").text("queued")
        }

        let (_logs, _guard) = testing::capture();
        let mut plain = BufferedWriter::new();
        handler.into_boxed_handler()
            .call(Request::test(Method::POST, "/jobs"), &mut plain).await.unwrap();

        let mut logged = BufferedWriter::new();
        log_response().wrap(handler.into_boxed_handler())
            .call(Request::test(Method::POST, "/jobs"), &mut logged).await.unwrap();

        assert_eq!(plain.status(), logged.status());
        assert_eq!(plain.headers(), logged.headers());
        assert_eq!(plain.body(), logged.body());
    }

    #[tokio::test]
    async fn sink_error_surfaces_from_the_chain() {
        let (_logs, _guard) = testing::capture();
        let handler = log_response().wrap((|_req: Request| async { "OK" }).into_boxed_handler());
        let mut writer = FlakyWriter::new(1, usize::MAX);

        let err = handler.call(Request::test(Method::GET, "/"), &mut writer).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}

//! The response sink handlers write into.
//!
//! A handler never talks to hyper directly. It writes its status, headers and
//! body bytes into a [`ResponseWriter`], and the server turns whatever ended
//! up in the sink into the wire response. Because the sink is a trait object
//! passed down the handler chain, middleware can put its own writer in front
//! of the real one. That is how [`log_response`](crate::middleware::log_response)
//! sees every byte a handler sends.
//!
//! ```text
//! handler ──write──▶ LoggingWriter ──write──▶ BufferedWriter ──▶ hyper
//!                        │
//!                        └─▶ tracing event "response"
//! ```

use std::io::{self, Write};

use bytes::{Bytes, BytesMut};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;

// ── ResponseWriter ────────────────────────────────────────────────────────────

/// A byte sink for one in-flight response.
///
/// Body bytes go through [`std::io::Write`]: `write` returns the number of
/// bytes accepted or the sink's error, exactly like any other writer. The
/// extra methods carry the parts of a response that are not body bytes.
pub trait ResponseWriter: Write + Send {
    /// The status code set so far (`200` until someone sets another).
    fn status(&self) -> u16;

    fn set_status(&mut self, status: u16);

    /// Append a header. Fails with [`io::ErrorKind::InvalidInput`] if the name
    /// or value is not valid HTTP.
    fn append_header(&mut self, name: &str, value: &str) -> io::Result<()>;
}

impl<W: ResponseWriter + ?Sized> ResponseWriter for &mut W {
    fn status(&self) -> u16 {
        (**self).status()
    }

    fn set_status(&mut self, status: u16) {
        (**self).set_status(status)
    }

    fn append_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        (**self).append_header(name, value)
    }
}

// ── BufferedWriter ────────────────────────────────────────────────────────────

/// The terminal sink: collects the whole response in memory.
///
/// Every write is accepted in full. Once the handler chain returns, the
/// server calls [`into_response`](BufferedWriter::into_response) and hands
/// the result to hyper.
#[derive(Debug)]
pub struct BufferedWriter {
    status: u16,
    headers: HeaderMap,
    body: BytesMut,
}

impl BufferedWriter {
    pub fn new() -> Self {
        Self { status: 200, headers: HeaderMap::new(), body: BytesMut::new() }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Body bytes written so far.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the collected parts into a hyper-ready response.
    ///
    /// A status outside `100..=999` cannot be represented and becomes
    /// `500 Internal Server Error`.
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body.freeze()));
        *res.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        *res.headers_mut() = self.headers;
        res
    }
}

impl Default for BufferedWriter {
    fn default() -> Self { Self::new() }
}

impl Write for BufferedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseWriter for BufferedWriter {
    fn status(&self) -> u16 {
        self.status
    }

    fn set_status(&mut self, status: u16) {
        self.status = status;
    }

    fn append_header(&mut self, name: &str, value: &str) -> io::Result<()> {
        let name = HeaderName::try_from(name)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let value = HeaderValue::try_from(value)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        self.headers.append(name, value);
        Ok(())
    }
}

//! HTTP transport seam between the client and the network.
//!
//! # Design
//! `HttpRequest` is plain data built by `TwitchClient::build_request` without
//! touching the network. A `Transport` executes it and hands back an
//! `HttpResponse` whose body is still an unread stream. The client decides
//! whether to read it: a non-200 response is dropped unread. Dropping the
//! response drops the body reader, which releases the underlying connection,
//! so the body is closed on every exit path without explicit cleanup.
//!
//! `UreqTransport` is the default implementation. Any other `Transport` can be
//! plugged in through `ClientBuilder::transport`, which is also how unit tests
//! observe requests without a socket.

use std::fmt;
use std::io::{self, Read};
use std::time::Duration;

use tracing::trace;

/// A GET request described as plain data. The Twitch endpoints used here
/// are read-only, so there is no method or body.
///
/// `url` is absolute and already carries the encoded query string. Header
/// order is stable: `Accept`, `Client-ID`, then `Authorization` when a token
/// is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response whose body has not been read yet.
///
/// The body reader owns the connection resource; it is released when the
/// response is dropped.
pub struct HttpResponse {
    pub status: u16,
    pub body: Box<dyn Read>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Read + 'static) -> Self {
        Self {
            status,
            body: Box::new(body),
        }
    }

    /// Convenience for in-memory bodies (fake transports, test vectors).
    pub fn from_bytes(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, io::Cursor::new(body.into()))
    }
}

impl fmt::Debug for HttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Executes one `HttpRequest`.
///
/// Implementations must return every HTTP status as a response, not as an
/// error; only failures to obtain a response at all are errors. `Send + Sync`
/// lets a configured client be shared between threads.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse>;
}

/// Blocking transport backed by a `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Transport without a deadline.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Transport whose calls fail once `timeout` has elapsed end to end.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    /// Wrap an agent configured elsewhere. The agent should have
    /// `http_status_as_error(false)` so non-200 responses reach the client.
    pub fn from_agent(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> io::Result<HttpResponse> {
        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            trace!(header = %name, "setting request header");
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.call().map_err(into_io)?;
        let status = response.status().as_u16();
        Ok(HttpResponse::new(status, response.into_body().into_reader()))
    }
}

/// Socket errors pass through as-is. Connection-level ureq errors get the
/// matching `io::ErrorKind` and keep the ureq error as the inner error.
fn into_io(err: ureq::Error) -> io::Error {
    let kind = match &err {
        ureq::Error::Timeout(_) => io::ErrorKind::TimedOut,
        ureq::Error::HostNotFound => io::ErrorKind::NotFound,
        ureq::Error::ConnectionFailed => io::ErrorKind::ConnectionRefused,
        _ => io::ErrorKind::Other,
    };
    match err {
        ureq::Error::Io(inner) => inner,
        other => io::Error::new(kind, other),
    }
}

//! Response interception shim.
//!
//! Handlers write into a [`ResponseSink`] instead of the network response
//! directly, so the instrumentation layer can observe the status code a
//! handler emitted after it returns.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// Per-request response buffer owned by the instrumentation layer.
///
/// Records the first explicit status code a handler sets; a handler that
/// never sets one gets the implicit 200.
#[derive(Debug)]
pub struct ResponseSink {
    status: Option<StatusCode>,
    content_type: Option<&'static str>,
    body: String,
}

impl ResponseSink {
    /// Create an empty sink with no status recorded.
    pub fn new() -> Self {
        Self {
            status: None,
            content_type: None,
            body: String::new(),
        }
    }

    /// Record an explicit status code. Only the first call sticks.
    pub fn set_status(&mut self, status: StatusCode) {
        if self.status.is_none() {
            self.status = Some(status);
        }
    }

    /// Set the response content type.
    pub fn set_content_type(&mut self, content_type: &'static str) {
        self.content_type = Some(content_type);
    }

    /// Append text to the response body.
    pub fn write_str(&mut self, text: &str) {
        self.body.push_str(text);
    }

    /// The status a handler emitted, or 200 if it never set one.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Build the final hyper response.
    pub fn into_response(self) -> Response<Full<Bytes>> {
        let status = self.status();
        let mut builder = Response::builder().status(status);
        if let Some(content_type) = self.content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(Full::new(Bytes::from(self.body))).unwrap()
    }
}

impl Default for ResponseSink {
    fn default() -> Self {
        Self::new()
    }
}

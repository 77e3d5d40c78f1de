use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde_json::Value;

/// Response-writing capability handed to handlers.
///
/// The router never writes through it; it only passes it on to the handler
/// it selected. Writers are expected to tolerate body writes before
/// `write_head` (an implicit `200 OK`) and to ignore writes after `done`.
pub trait ResponseWriter {
    /// Set the status line and headers.
    fn write_head(&mut self, status: StatusCode, headers: HeaderMap);

    /// Append bytes to the response body.
    fn write_body(&mut self, chunk: &[u8]);

    /// Mark the response complete.
    fn done(&mut self);

    /// Abandon the response. The host answers with an error instead.
    fn abort(&mut self);

    /// Write a complete `text/plain` response.
    fn write_text(&mut self, status: StatusCode, body: &str) {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        self.write_head(status, headers);
        self.write_body(body.as_bytes());
        self.done();
    }

    /// Write a complete `application/json` response.
    fn write_json(&mut self, status: StatusCode, body: &Value) {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.write_head(status, headers);
        self.write_body(body.to_string().as_bytes());
        self.done();
    }
}

/// In-memory [`ResponseWriter`].
///
/// The HTTP adapter renders one of these onto the wire once the handler
/// returns; tests inspect it directly.
#[derive(Debug, Clone, Default)]
pub struct BufferedResponse {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
    done: bool,
    aborted: bool,
}

impl BufferedResponse {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True once a handler wrote a status line or any body bytes.
    #[must_use]
    pub fn head_written(&self) -> bool {
        self.status.is_some()
    }

    /// Status written by the handler, `200 OK` if only a body was written.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, lossy.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Consume into `(status, headers, body)`.
    #[must_use]
    pub fn into_parts(self) -> (Option<StatusCode>, HeaderMap, Vec<u8>) {
        (self.status, self.headers, self.body)
    }

    fn is_closed(&self) -> bool {
        self.done || self.aborted
    }
}

impl ResponseWriter for BufferedResponse {
    fn write_head(&mut self, status: StatusCode, headers: HeaderMap) {
        if self.is_closed() {
            return;
        }
        self.status = Some(status);
        self.headers = headers;
    }

    fn write_body(&mut self, chunk: &[u8]) {
        if self.is_closed() {
            return;
        }
        self.status.get_or_insert(StatusCode::OK);
        self.body.extend_from_slice(chunk);
    }

    fn done(&mut self) {
        self.done = true;
    }

    fn abort(&mut self) {
        if !self.done {
            self.aborted = true;
        }
    }
}

use crate::ids::RequestId;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;

/// Inbound request as seen by the router and its handlers.
///
/// `target` is the raw path portion of the request URI and is matched
/// verbatim: it is not percent-decoded and must not carry the query string.
/// The host adapter splits the query off into [`Request::query`].
#[derive(Debug, Clone)]
pub struct Request {
    /// Unique request ID for log correlation
    pub request_id: RequestId,
    /// HTTP method
    pub method: Method,
    /// Raw request path, without the query string
    pub target: String,
    /// Raw query string (text after `?`), if any
    pub query: Option<String>,
    /// Request headers
    pub headers: HeaderMap,
}

impl Request {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            target: target.into(),
            query: None,
            headers: HeaderMap::new(),
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Get a header as text. Names are case-insensitive.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Split a raw request URI into path and optional query string.
///
/// ```
/// use segrouter::server::split_target;
///
/// assert_eq!(split_target("/users?limit=10"), ("/users", Some("limit=10")));
/// assert_eq!(split_target("/users"), ("/users", None));
/// ```
#[must_use]
pub fn split_target(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let req = Request::new(Method::POST, "/upload")
            .with_header(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn test_split_target_keeps_empty_query() {
        assert_eq!(split_target("/a?"), ("/a", Some("")));
        assert_eq!(split_target(""), ("", None));
    }
}

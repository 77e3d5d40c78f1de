//! Demo route table served by `segrouter serve`.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /echo/{string}` | the segment, as text |
//! | `GET /numbers/{int}` | `{"value": n}` |
//! | `POST /echo` | the request body, streamed back |
//! | `GET /` | a greeting; `/` is the empty pattern, so this catches every other `GET` |

use crate::handler::{BodyChunk, BodyDirective};
use crate::router::{parse_segments, PathPattern, Router, SegmentMatcher};
use crate::server::{Request, ResponseWriter};
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use http::{Method, StatusCode};
use serde_json::json;

/// Build the demo router. The catch-all `GET /` is registered last.
#[must_use]
pub fn demo_router() -> Router {
    let mut router = Router::new();
    router
        .on(
            Method::GET,
            vec![SegmentMatcher::fixed("echo"), SegmentMatcher::AnyString],
            echo_segment,
        )
        .on(
            Method::GET,
            PathPattern::new(vec![SegmentMatcher::fixed("numbers"), SegmentMatcher::Integer]),
            number,
        )
        .on(Method::POST, "/echo", echo_body)
        .on(Method::GET, "/", index);
    router
}

fn index(_req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective {
    res.write_text(StatusCode::OK, "segrouter\n");
    BodyDirective::Discard
}

fn echo_segment(req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective {
    let segments = parse_segments(&req.target);
    let word = segments.get(1).copied().unwrap_or_default();
    res.write_text(StatusCode::OK, word);
    BodyDirective::Discard
}

fn number(req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective {
    match parse_segments(&req.target)
        .get(1)
        .and_then(|s| s.parse::<i64>().ok())
    {
        Some(value) => res.write_json(StatusCode::OK, &json!({ "value": value })),
        None => res.write_json(
            StatusCode::BAD_REQUEST,
            &json!({ "error": "expected an integer segment" }),
        ),
    }
    BodyDirective::Discard
}

fn echo_body(req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective {
    let content_type = req
        .headers
        .get(CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("application/octet-stream"));
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, content_type);
    res.write_head(StatusCode::OK, headers);

    BodyDirective::process(|chunk, res| match chunk {
        BodyChunk::Data(bytes) => res.write_body(bytes),
        BodyChunk::End => res.done(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::BufferedResponse;

    fn get(router: &Router, target: &str) -> BufferedResponse {
        let mut res = BufferedResponse::new();
        router.handle(&Request::new(Method::GET, target), &mut res);
        res
    }

    #[test]
    fn test_echo_segment() {
        let res = get(&demo_router(), "/echo/hello/ignored");
        assert_eq!(res.body_text(), "hello");
    }

    #[test]
    fn test_number_route_only_takes_integers() {
        let router = demo_router();
        assert_eq!(get(&router, "/numbers/-12").body_text(), r#"{"value":-12}"#);
        // falls through to the catch-all
        assert_eq!(get(&router, "/numbers/twelve").body_text(), "segrouter\n");
    }

    #[test]
    fn test_echo_body_streams_chunks() {
        let router = demo_router();
        let mut res = BufferedResponse::new();
        let directive = router.handle(&Request::new(Method::POST, "/echo"), &mut res);
        let BodyDirective::Process(mut processor) = directive else {
            panic!("expected a body processor");
        };
        processor(BodyChunk::Data(b"hello "), &mut res);
        processor(BodyChunk::Data(b"world"), &mut res);
        processor(BodyChunk::End, &mut res);
        assert_eq!(res.body_text(), "hello world");
        assert!(res.is_done());
        assert_eq!(
            res.headers().get(CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
    }
}

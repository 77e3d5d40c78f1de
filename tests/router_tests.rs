#![allow(clippy::unwrap_used, clippy::expect_used)]

use http::{Method, StatusCode};
use segrouter::{
    handler::{BodyDirective, Handler},
    router::{PathPattern, Router, SegmentMatcher},
    server::{BufferedResponse, Request, ResponseWriter},
};
use std::sync::{Arc, Mutex};
use std::thread;

/// Writes a fixed body, like a static page.
struct StaticApp {
    body: &'static str,
}

impl Handler for StaticApp {
    fn handle(&self, _req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective {
        res.write_text(StatusCode::OK, self.body);
        BodyDirective::Discard
    }
}

fn example_router() -> Router {
    let mut router = Router::new();
    router.on_handler(Method::GET, "/foo", StaticApp { body: "bar" });
    router.on_handler(Method::POST, "/baz", StaticApp { body: "qux" });
    router
}

fn dispatch(router: &Router, method: Method, target: &str) -> (BodyDirective, BufferedResponse) {
    let mut res = BufferedResponse::new();
    let directive = router.handle(&Request::new(method, target), &mut res);
    (directive, res)
}

fn assert_body(router: &Router, method: Method, target: &str, expected: Option<&str>) {
    let (directive, res) = dispatch(router, method.clone(), target);
    match expected {
        Some(body) => {
            assert_eq!(res.body_text(), body, "{method} {target}");
        }
        None => {
            assert!(directive.is_discard(), "{method} {target}");
            assert!(!res.head_written(), "{method} {target} should not be answered");
        }
    }
}

#[test]
fn test_router_get_foo() {
    assert_body(&example_router(), Method::GET, "/foo", Some("bar"));
}

#[test]
fn test_router_post_baz() {
    assert_body(&example_router(), Method::POST, "/baz", Some("qux"));
}

#[test]
fn test_router_method_mismatch_is_no_match() {
    assert_body(&example_router(), Method::GET, "/baz", None);
    assert_body(&example_router(), Method::PUT, "/foo", None);
}

#[test]
fn test_router_prefix_match_reaches_handler() {
    assert_body(&example_router(), Method::GET, "/foo/extra", Some("bar"));
    assert_body(&example_router(), Method::GET, "//foo//", Some("bar"));
}

#[test]
fn test_router_unknown_path() {
    assert_body(&example_router(), Method::GET, "/does/not/exist", None);
    assert_body(&example_router(), Method::GET, "/", None);
}

#[test]
fn test_earlier_route_shadows_later_one() {
    let mut router = Router::new();
    router.on_handler(Method::GET, PathPattern::default(), StaticApp { body: "catch-all" });
    router.on_handler(Method::GET, "/foo", StaticApp { body: "foo" });
    assert_body(&router, Method::GET, "/foo", Some("catch-all"));
}

#[test]
fn test_specific_route_before_wildcard() {
    let mut router = Router::new();
    router.on_handler(
        Method::GET,
        vec![SegmentMatcher::fixed("users"), SegmentMatcher::fixed("me")],
        StaticApp { body: "me" },
    );
    router.on_handler(
        Method::GET,
        vec![SegmentMatcher::fixed("users"), SegmentMatcher::Integer],
        StaticApp { body: "by-id" },
    );
    router.on_handler(
        Method::GET,
        vec![SegmentMatcher::fixed("users"), SegmentMatcher::AnyString],
        StaticApp { body: "by-name" },
    );

    assert_body(&router, Method::GET, "/users/me", Some("me"));
    assert_body(&router, Method::GET, "/users/-3", Some("by-id"));
    assert_body(&router, Method::GET, "/users/alice", Some("by-name"));
    assert_body(&router, Method::GET, "/users", None);
}

#[test]
fn test_handler_sees_request_unchanged() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    let mut router = Router::new();
    router.on(
        Method::GET,
        "/items",
        move |req: &Request, _res: &mut dyn ResponseWriter| {
            log.lock().unwrap().push((req.target.clone(), req.query.clone()));
            BodyDirective::Discard
        },
    );

    let mut res = BufferedResponse::new();
    router.handle(
        &Request::new(Method::GET, "/items/%41").with_query("page=2"),
        &mut res,
    );
    assert_eq!(
        *seen.lock().unwrap(),
        vec![("/items/%41".to_string(), Some("page=2".to_string()))]
    );
}

#[test]
fn test_concurrent_dispatch_on_shared_router() {
    let router = Arc::new(example_router());
    let workers: Vec<_> = (0..8)
        .map(|i| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for _ in 0..100 {
                    let (method, target, body) = if i % 2 == 0 {
                        (Method::GET, "/foo", "bar")
                    } else {
                        (Method::POST, "/baz/1", "qux")
                    };
                    let (_, res) = dispatch(&router, method, target);
                    assert_eq!(res.body_text(), body);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }
}

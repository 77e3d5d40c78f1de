//! # segrouter
//!
//! **segrouter** is a small request router for HTTP servers. It matches a
//! request's method and path against an ordered list of routes and hands the
//! request to the first route that matches.
//!
//! ## Overview
//!
//! - **[`router`]** - path segmentation, segment matchers, patterns and the
//!   route table
//! - **[`handler`]** - the handler capability and body directives
//! - **[`server`]** - request/response types and an HTTP host built on
//!   `tiny_http`
//! - **[`config`]** - YAML + environment configuration for the host
//! - **[`logging`]** - `tracing-subscriber` setup for the binary
//! - **[`cli`]** - the `segrouter` command line
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Host as HttpServer<br/>(tiny_http)
//!     participant Router as Router
//!     participant Handler as Handler
//!
//!     Client->>Host: GET /numbers/42
//!     Host->>Host: Split path / query,<br/>copy headers
//!     Host->>Router: handle(request, response)
//!     Router->>Router: Scan routes in<br/>registration order
//!
//!     alt No Route Match
//!         Router-->>Host: BodyDirective::Discard<br/>(nothing written)
//!         Host-->>Client: fallback status (404)
//!     end
//!
//!     Router->>Handler: handle(request, response)
//!     Handler->>Handler: write status, headers, body
//!     Handler-->>Router: BodyDirective
//!     Router-->>Host: BodyDirective
//!     Host->>Host: Stream or drop<br/>the request body
//!     Host-->>Client: HTTP response
//! ```
//!
//! ## Matching Semantics
//!
//! A path is split on `/` with empty segments dropped. A pattern is a list of
//! segment matchers: [`SegmentMatcher::Fixed`] (exact text),
//! [`SegmentMatcher::AnyString`] and [`SegmentMatcher::Integer`] (signed,
//! 64-bit). A pattern matches when each matcher accepts the segment at its
//! position; segments beyond the pattern's length are ignored, so `/foo`
//! also matches `/foo/bar`. Routes are not ranked: the first registered match
//! wins, and a request that matches nothing gets [`BodyDirective::Discard`]
//! with no response written.
//!
//! ## Quick Start
//!
//! ```no_run
//! use segrouter::handler::BodyDirective;
//! use segrouter::router::{Router, SegmentMatcher};
//! use segrouter::server::{HttpServer, Request, ResponseWriter};
//! use http::{Method, StatusCode};
//! use std::sync::Arc;
//!
//! let mut router = Router::new();
//! router.on(Method::GET, "/health", |_req: &Request, res: &mut dyn ResponseWriter| {
//!     res.write_text(StatusCode::OK, "ok");
//!     BodyDirective::Discard
//! });
//! router.on(
//!     Method::GET,
//!     vec![SegmentMatcher::fixed("users"), SegmentMatcher::Integer],
//!     |req: &Request, res: &mut dyn ResponseWriter| {
//!         res.write_text(StatusCode::OK, &req.target);
//!         BodyDirective::Discard
//!     },
//! );
//!
//! // Register everything before sharing the router with the server.
//! let handle = HttpServer::new(Arc::new(router))
//!     .start("127.0.0.1:8080")
//!     .expect("bind");
//! handle.join();
//! ```
//!
//! ## Concurrency
//!
//! Dispatch only reads the route table, so one `Arc<Router>` can serve any
//! number of threads without locking. Registration needs `&mut Router`,
//! which makes "register all routes before serving" a compile-time rule
//! rather than a convention.

pub mod cli;
pub mod config;
pub mod handler;
pub mod ids;
pub mod logging;
pub mod router;
pub mod server;

pub use handler::{BodyChunk, BodyDirective, Handler};
pub use router::{PathPattern, Route, Router, SegmentMatcher};
pub use server::{BufferedResponse, Request, ResponseWriter};

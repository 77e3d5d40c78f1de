//! Router core: the route table and first-match dispatch.

use crate::handler::{BodyDirective, Handler};
use crate::server::{Request, ResponseWriter};
use http::Method;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::matcher::PathPattern;

/// Lookups slower than this are logged at `warn`.
pub const SLOW_MATCH_THRESHOLD: Duration = Duration::from_millis(1);

/// A registered `(method, pattern, handler)` triple.
pub struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Box<dyn Handler>,
}

impl Route {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &dyn Handler {
        self.handler.as_ref()
    }

    /// True when both the method and the (prefix) pattern match.
    #[inline]
    #[must_use]
    pub fn matches(&self, method: &Method, target: &str) -> bool {
        self.method == *method && self.pattern.matches(target)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("pattern", &format_args!("{}", self.pattern))
            .finish_non_exhaustive()
    }
}

/// Ordered route table with first-match-wins dispatch.
///
/// Routes are kept in registration order and never removed, reordered or
/// deduplicated. A lookup scans them in that order and picks the first route
/// whose method is equal to the request's and whose pattern matches the
/// request target. Patterns match by prefix (see [`PathPattern::matches`]),
/// so a route for `/foo` also answers `/foo/extra` unless an earlier route
/// claims it.
///
/// Registration needs `&mut self`. Register everything first, then share the
/// router (typically as `Arc<Router>`) with the server; dispatch only takes
/// `&self` and never mutates the table, so concurrent lookups need no locks.
///
/// ```
/// use segrouter::router::Router;
/// use segrouter::handler::BodyDirective;
/// use segrouter::server::{BufferedResponse, Request, ResponseWriter};
/// use http::{Method, StatusCode};
///
/// let mut router = Router::new();
/// router.on(Method::GET, "/foo", |_req: &Request, res: &mut dyn ResponseWriter| {
///     res.write_text(StatusCode::OK, "bar");
///     BodyDirective::Discard
/// });
///
/// let mut res = BufferedResponse::new();
/// router.handle(&Request::new(Method::GET, "/foo"), &mut res);
/// assert_eq!(res.body_text(), "bar");
/// ```
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route handled by a closure or function.
    ///
    /// `pattern` accepts anything convertible into a [`PathPattern`]; a plain
    /// `&str` becomes a pattern of fixed segments. Never fails and performs no
    /// validation.
    pub fn on<P, F>(&mut self, method: Method, pattern: P, handler: F) -> &mut Self
    where
        P: Into<PathPattern>,
        F: Fn(&Request, &mut dyn ResponseWriter) -> BodyDirective + Send + Sync + 'static,
    {
        self.on_handler(method, pattern, handler)
    }

    /// Append a route handled by any [`Handler`] implementation.
    pub fn on_handler<P, H>(&mut self, method: Method, pattern: P, handler: H) -> &mut Self
    where
        P: Into<PathPattern>,
        H: Handler + 'static,
    {
        let pattern = pattern.into();
        debug!(method = %method, pattern = %pattern, index = self.routes.len(), "Route registered");
        self.routes.push(Route {
            method,
            pattern,
            handler: Box::new(handler),
        });
        self
    }

    /// First route matching `method` and `target`, in registration order.
    #[must_use]
    pub fn find(&self, method: &Method, target: &str) -> Option<&Route> {
        debug!(method = %method, target = %target, routes = self.routes.len(), "Route match attempt");

        let match_start = Instant::now();
        let found = self.routes.iter().find(|route| route.matches(method, target));
        let match_duration = match_start.elapsed();

        if match_duration > SLOW_MATCH_THRESHOLD {
            warn!(
                method = %method,
                target = %target,
                duration_us = match_duration.as_micros(),
                routes = self.routes.len(),
                "Slow route matching detected"
            );
        }

        match found {
            Some(route) => debug!(
                method = %method,
                target = %target,
                pattern = %route.pattern,
                duration_us = match_duration.as_micros(),
                "Route matched"
            ),
            None => debug!(
                method = %method,
                target = %target,
                duration_us = match_duration.as_micros(),
                "No route matched"
            ),
        }
        found
    }

    /// Dispatch `req` to the first matching route's handler.
    ///
    /// Returns whatever the handler returns. When nothing matches, no handler
    /// runs, nothing is written to `res` and [`BodyDirective::Discard`] is
    /// returned; answering unmatched requests is left to the caller.
    pub fn handle(&self, req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective {
        match self.find(&req.method, &req.target) {
            Some(route) => route.handler.handle(req, res),
            None => BodyDirective::Discard,
        }
    }

    /// Registered routes in registration order.
    pub fn routes(&self) -> impl ExactSizeIterator<Item = &Route> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log every registered route at `info`.
    pub fn dump_routes(&self) {
        info!(routes_count = self.routes.len(), "Routing table");
        for (index, route) in self.routes.iter().enumerate() {
            info!(index, method = %route.method, pattern = %route.pattern, "Route");
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router").field("routes", &self.routes).finish()
    }
}

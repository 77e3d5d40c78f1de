//! Handler capability and request-body directives.
//!
//! A handler receives the matched [`Request`] and a [`ResponseWriter`], writes
//! its response through the writer and returns a [`BodyDirective`] telling the
//! host what to do with the part of the request body it has not read yet.
//!
//! Any `Fn(&Request, &mut dyn ResponseWriter) -> BodyDirective` closure that
//! is `Send + Sync` is a handler:
//!
//! ```
//! use segrouter::handler::{BodyDirective, Handler};
//! use segrouter::server::{Request, ResponseWriter};
//! use http::StatusCode;
//!
//! fn hello(_req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective {
//!     res.write_text(StatusCode::OK, "hello");
//!     BodyDirective::Discard
//! }
//!
//! fn assert_handler<H: Handler>(_: H) {}
//! assert_handler(hello);
//! ```

use crate::server::{Request, ResponseWriter};
use std::fmt;

/// One step of a streamed request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyChunk<'a> {
    /// Next slice of body bytes.
    Data(&'a [u8]),
    /// The body is complete; no further chunks follow.
    End,
}

/// Callback fed with the request body, chunk by chunk, then [`BodyChunk::End`].
///
/// It receives the same response writer the handler wrote to, so a handler
/// can defer (part of) its response until the body has been seen.
pub type BodyProcessor = Box<dyn FnMut(BodyChunk<'_>, &mut dyn ResponseWriter) + Send>;

/// What the host should do with the unread request body.
#[derive(Default)]
pub enum BodyDirective {
    /// Drop the remaining body. Returned when no route matches and by
    /// handlers that never look at the body.
    #[default]
    Discard,
    /// Stream the remaining body into the processor.
    Process(BodyProcessor),
}

impl BodyDirective {
    /// Wrap a closure as [`BodyDirective::Process`].
    pub fn process<F>(processor: F) -> Self
    where
        F: FnMut(BodyChunk<'_>, &mut dyn ResponseWriter) + Send + 'static,
    {
        BodyDirective::Process(Box::new(processor))
    }

    #[must_use]
    pub fn is_discard(&self) -> bool {
        matches!(self, BodyDirective::Discard)
    }
}

impl fmt::Debug for BodyDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyDirective::Discard => f.write_str("Discard"),
            BodyDirective::Process(_) => f.write_str("Process(..)"),
        }
    }
}

/// Request handler stored in a route.
///
/// The router owns its handlers and calls them by shared reference, possibly
/// from several threads at once, hence `Send + Sync`. Failures are the
/// handler's own business: the router neither catches nor retries them.
pub trait Handler: Send + Sync {
    fn handle(&self, req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut dyn ResponseWriter) -> BodyDirective + Send + Sync,
{
    #[inline]
    fn handle(&self, req: &Request, res: &mut dyn ResponseWriter) -> BodyDirective {
        self(req, res)
    }
}

//! # Router Module
//!
//! Path matching and first-match route dispatch.
//!
//! ## Overview
//!
//! - [`parse_segments`] splits a path into its non-empty `/`-delimited
//!   segments.
//! - [`SegmentMatcher`] tests one segment: a fixed string, any string, or a
//!   signed integer.
//! - [`PathPattern`] is an ordered list of segment matchers tested against
//!   the leading segments of a path.
//! - [`Router`] holds `(method, pattern, handler)` routes in registration
//!   order and hands each request to the first route that matches.
//!
//! ## Matching rules
//!
//! Matching is by prefix: a pattern with `n` matchers looks only at the first
//! `n` segments of the target, so `/foo` matches `/foo/bar`. A target with
//! fewer than `n` segments never matches. Routes are not ranked; the earliest
//! registered match wins.
//!
//! ```rust
//! use segrouter::router::{PathPattern, SegmentMatcher};
//!
//! let pattern = PathPattern::new(vec![
//!     SegmentMatcher::fixed("foo"),
//!     SegmentMatcher::fixed("bar"),
//!     SegmentMatcher::Integer,
//! ]);
//! assert!(pattern.matches("/foo/bar/42"));
//! assert!(!pattern.matches("/foo/bar/baz"));
//! assert!(!pattern.matches("/foo/bar"));
//! ```
//!
//! ## Performance
//!
//! Lookups are a linear scan: O(routes × pattern length) in the worst case.
//! Segments are borrowed from the target and kept on the stack for paths up
//! to [`MAX_INLINE_SEGMENTS`] deep, so a lookup does not allocate.

mod core;
mod matcher;

pub use core::{Route, Router, SLOW_MATCH_THRESHOLD};
pub use matcher::{
    parse_segments, PathPattern, PatternError, SegmentMatcher, Segments, MAX_INLINE_SEGMENTS,
};

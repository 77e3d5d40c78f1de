//! Path segmentation and segment-level matching.
//!
//! A path is split on `/` and empty tokens are dropped, so `/a//b/`, `a/b`
//! and `/a/b` all yield the segments `["a", "b"]`. No percent-decoding or
//! query stripping happens here; callers hand in the path portion only.
//!
//! A [`PathPattern`] is an ordered list of [`SegmentMatcher`]s compared
//! pairwise against the *leading* segments of a target path. Targets with
//! more segments than the pattern still match as long as the compared prefix
//! does (see [`PathPattern::matches`]).

use smallvec::SmallVec;
use std::fmt;

/// Number of segments kept on the stack before a lookup allocates.
/// Routed paths rarely go deeper than this.
pub const MAX_INLINE_SEGMENTS: usize = 8;

/// Non-empty path segments borrowed from the parsed path.
pub type Segments<'a> = SmallVec<[&'a str; MAX_INLINE_SEGMENTS]>;

/// Split `path` into its non-empty `/`-delimited segments.
///
/// Leading, trailing and repeated slashes are normalized away. Returns an
/// empty list for `""` and `"/"`. Never fails.
///
/// ```
/// use segrouter::router::parse_segments;
///
/// assert_eq!(parse_segments("//foo/bar/").as_slice(), &["foo", "bar"]);
/// assert!(parse_segments("/").is_empty());
/// ```
#[must_use]
pub fn parse_segments(path: &str) -> Segments<'_> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Predicate over a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentMatcher {
    /// Matches a segment equal to the value (case-sensitive).
    Fixed(String),
    /// Matches any segment.
    AnyString,
    /// Matches a segment that parses completely as a signed 64-bit integer.
    ///
    /// An optional leading `+` or `-` is accepted; leading zeros are allowed.
    /// Anything outside the `i64` range, or with trailing characters, fails.
    Integer,
}

impl SegmentMatcher {
    /// Shorthand for [`SegmentMatcher::Fixed`].
    pub fn fixed(value: impl Into<String>) -> Self {
        SegmentMatcher::Fixed(value.into())
    }

    /// Test a single segment.
    #[inline]
    #[must_use]
    pub fn matches(&self, segment: &str) -> bool {
        match self {
            SegmentMatcher::Fixed(value) => segment == value,
            SegmentMatcher::AnyString => true,
            SegmentMatcher::Integer => segment.parse::<i64>().is_ok(),
        }
    }
}

impl fmt::Display for SegmentMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentMatcher::Fixed(value) => f.write_str(value),
            SegmentMatcher::AnyString => f.write_str("{string}"),
            SegmentMatcher::Integer => f.write_str("{int}"),
        }
    }
}

/// Failure to parse a pattern template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A `{...}` segment names a placeholder other than `string`, `*` or `int`.
    UnknownPlaceholder {
        template: String,
        placeholder: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::UnknownPlaceholder {
                template,
                placeholder,
            } => write!(
                f,
                "unknown placeholder `{{{placeholder}}}` in pattern `{template}` (expected {{string}}, {{*}} or {{int}})"
            ),
        }
    }
}

impl std::error::Error for PatternError {}

/// Ordered sequence of segment matchers used to test a whole path.
///
/// # Prefix semantics
///
/// [`matches`](Self::matches) compares the pattern against the first
/// `len()` segments of the target and ignores anything after them, so
/// `PathPattern::from("/foo")` matches `/foo`, `/foo/bar` and `/foo/bar/baz`.
/// A target with fewer segments than the pattern never matches, and the empty
/// pattern matches every target. Use [`matches_exact`](Self::matches_exact)
/// when the segment counts must agree.
///
/// # Construction
///
/// - [`PathPattern::new`] / `collect()` from explicit matchers
/// - `From<&str>` / [`PathPattern::literal`]: every segment becomes
///   [`SegmentMatcher::Fixed`], which is what lets a plain path string be
///   used wherever a pattern is expected
/// - [`PathPattern::from_template`]: `{string}`, `{*}` and `{int}` placeholders
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathPattern {
    matchers: Vec<SegmentMatcher>,
}

impl PathPattern {
    #[must_use]
    pub fn new(matchers: Vec<SegmentMatcher>) -> Self {
        Self { matchers }
    }

    /// Pattern whose matchers are the literal segments of `path`.
    #[must_use]
    pub fn literal(path: &str) -> Self {
        parse_segments(path)
            .into_iter()
            .map(SegmentMatcher::fixed)
            .collect()
    }

    /// Parse a template such as `/users/{int}/files/{string}`.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::UnknownPlaceholder`] when a segment of the form
    /// `{name}` uses a name other than `string`, `*` or `int`.
    pub fn from_template(template: &str) -> Result<Self, PatternError> {
        parse_segments(template)
            .into_iter()
            .map(|segment| {
                let Some(placeholder) = segment
                    .strip_prefix('{')
                    .and_then(|rest| rest.strip_suffix('}'))
                else {
                    return Ok(SegmentMatcher::fixed(segment));
                };
                match placeholder {
                    "string" | "*" => Ok(SegmentMatcher::AnyString),
                    "int" => Ok(SegmentMatcher::Integer),
                    other => Err(PatternError::UnknownPlaceholder {
                        template: template.to_string(),
                        placeholder: other.to_string(),
                    }),
                }
            })
            .collect()
    }

    #[must_use]
    pub fn matchers(&self) -> &[SegmentMatcher] {
        &self.matchers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Prefix match of `target` against this pattern.
    ///
    /// False when the target has fewer segments than the pattern; otherwise
    /// true iff every matcher accepts the segment at the same position.
    /// Segments past the pattern's length are not inspected.
    #[must_use]
    pub fn matches(&self, target: &str) -> bool {
        self.matches_segments(&parse_segments(target))
    }

    /// Like [`matches`](Self::matches), but the target must have exactly as
    /// many segments as the pattern.
    #[must_use]
    pub fn matches_exact(&self, target: &str) -> bool {
        let segments = parse_segments(target);
        segments.len() == self.matchers.len() && self.matches_segments(&segments)
    }

    fn matches_segments(&self, segments: &[&str]) -> bool {
        if segments.len() < self.matchers.len() {
            return false;
        }
        self.matchers
            .iter()
            .zip(segments)
            .all(|(matcher, segment)| matcher.matches(segment))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matchers.is_empty() {
            return f.write_str("/");
        }
        for matcher in &self.matchers {
            write!(f, "/{matcher}")?;
        }
        Ok(())
    }
}

impl From<&str> for PathPattern {
    fn from(path: &str) -> Self {
        Self::literal(path)
    }
}

impl From<&String> for PathPattern {
    fn from(path: &String) -> Self {
        Self::literal(path)
    }
}

impl From<String> for PathPattern {
    fn from(path: String) -> Self {
        Self::literal(&path)
    }
}

impl From<Vec<SegmentMatcher>> for PathPattern {
    fn from(matchers: Vec<SegmentMatcher>) -> Self {
        Self::new(matchers)
    }
}

impl FromIterator<SegmentMatcher> for PathPattern {
    fn from_iter<I: IntoIterator<Item = SegmentMatcher>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

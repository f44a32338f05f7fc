//! Per-field keep/drop decisions.
//!
//! A [`FilterPlan`] is built once per invocation from the two specs and then
//! consulted for every field the walker meets. Decisions are keyed by the full
//! traversal path, so the same field name (or the same reused shape) can be
//! visible at one location and hidden at another.

use crate::mode::Mode;
use crate::path::{PathSpec, SEGMENT_SEPARATOR};
use serde::Serialize;
use std::fmt;

/// Outcome for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDecision {
    /// Emit the field.
    Keep,
    /// Omit the field and everything below it.
    Drop,
}

impl FilterDecision {
    /// Returns true for [`FilterDecision::Keep`].
    #[must_use]
    pub const fn is_keep(self) -> bool {
        matches!(self, Self::Keep)
    }

    const fn from_bool(keep: bool) -> Self {
        if keep { Self::Keep } else { Self::Drop }
    }
}

/// Field names from the root down to the object currently being walked.
///
/// Lives on the walker's call stack: pushed on descent, popped on backtrack.
/// Collection elements do not add segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalPath {
    segments: Vec<String>,
}

impl TraversalPath {
    /// Creates the root path (no segments).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from explicit segments.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the nesting depth (0 at the root).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Appends a field name.
    pub fn push(&mut self, field: impl Into<String>) {
        self.segments.push(field.into());
    }

    /// Truncates back to the parent.
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// Renders `self.field` without mutating the path.
    #[must_use]
    pub fn child(&self, field: &str) -> String {
        if self.segments.is_empty() {
            return field.to_string();
        }
        format!("{self}{SEGMENT_SEPARATOR}{field}")
    }
}

impl fmt::Display for TraversalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEGMENT_SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

/// Resolved filtering policy for one invocation.
///
/// # Examples
///
/// ```
/// use field_filter::{FilterDecision, FilterPlan, PathSpec, TraversalPath};
///
/// let plan = FilterPlan::new(
///     PathSpec::parse(Some("a.b"))?,
///     PathSpec::parse(Some("a.b.c"))?,
/// );
/// let a = TraversalPath::from_segments(["a"]);
/// let ab = TraversalPath::from_segments(["a", "b"]);
///
/// assert_eq!(plan.decide(&TraversalPath::root(), "a", true), FilterDecision::Keep);
/// assert_eq!(plan.decide(&a, "b", true), FilterDecision::Keep);
/// assert_eq!(plan.decide(&ab, "c", false), FilterDecision::Drop);
/// assert_eq!(plan.decide(&ab, "d", false), FilterDecision::Keep);
/// # Ok::<(), field_filter::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPlan {
    mode: Mode,
    include: PathSpec,
    exclude: PathSpec,
}

impl FilterPlan {
    /// Builds a plan, resolving the mode from the specs.
    #[must_use]
    pub fn new(include: PathSpec, exclude: PathSpec) -> Self {
        let mode = Mode::resolve(&include, &exclude);
        Self {
            mode,
            include,
            exclude,
        }
    }

    /// A plan that keeps everything.
    #[must_use]
    pub fn pass_through() -> Self {
        Self::new(PathSpec::new(), PathSpec::new())
    }

    /// Returns the resolved mode.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the include spec.
    #[must_use]
    pub const fn include(&self) -> &PathSpec {
        &self.include
    }

    /// Returns the exclude spec.
    #[must_use]
    pub const fn exclude(&self) -> &PathSpec {
        &self.exclude
    }

    /// Decides whether `parent.field` is emitted.
    ///
    /// Exclusion at a path hides everything beneath it and always wins over
    /// inclusion at the same or a deeper path. In whitelist mode a field is
    /// kept when it is named, lies beneath a named path, or (composites only)
    /// is an ancestor of a named path.
    #[must_use]
    pub fn decide(&self, parent: &TraversalPath, field: &str, is_composite: bool) -> FilterDecision {
        self.decide_at(parent.segments(), field, is_composite)
    }

    /// Decides whether a scalar element of the collection at `path` is emitted.
    ///
    /// Elements carry the path of the field holding the collection, so a
    /// scalar element is kept exactly when a scalar field at `path` would be.
    /// Elements of a root collection have no field and are always kept.
    #[must_use]
    pub fn decide_element(&self, path: &TraversalPath) -> FilterDecision {
        match path.segments().split_last() {
            Some((field, parent)) => self.decide_at(parent, field, false),
            None => FilterDecision::Keep,
        }
    }

    fn decide_at(&self, parent: &[String], field: &str, is_composite: bool) -> FilterDecision {
        let keep = match self.mode {
            Mode::PassThrough => true,
            Mode::Blacklist => !self.exclude.covers(parent, field),
            Mode::Whitelist => {
                let included = self.include.covers(parent, field)
                    || (is_composite && self.include.has_descendant_of(parent, field));
                included && !self.exclude.covers(parent, field)
            }
        };
        FilterDecision::from_bool(keep)
    }

    /// Decides whether the walker should visit the children of `parent.field`.
    ///
    /// Only composites are descended, and only when kept: a kept whole-object
    /// include is still walked so excludes beneath it can prune.
    #[must_use]
    pub fn should_descend(&self, parent: &TraversalPath, field: &str, is_composite: bool) -> bool {
        is_composite && self.decide(parent, field, is_composite).is_keep()
    }

    /// Returns true if the plan can never drop anything.
    #[must_use]
    pub fn is_pass_through(&self) -> bool {
        self.mode == Mode::PassThrough
    }
}

impl Default for FilterPlan {
    fn default() -> Self {
        Self::pass_through()
    }
}

//! Field path parsing.
//!
//! Raw selections look like `accountNumber, transactions.amount`: a comma
//! separated list of dot-delimited paths. Each segment must be a non-empty
//! run of ASCII letters, digits and underscores.

use crate::error::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Separator between paths in a raw selection.
pub const LIST_SEPARATOR: char = ',';

/// Separator between segments of a single path.
pub const SEGMENT_SEPARATOR: char = '.';

/// An ordered, non-empty sequence of field names addressing a nested field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parses a single dot-delimited path such as `account.address.city`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is empty, has an empty
    /// segment, or a segment contains a character outside `[A-Za-z0-9_]`.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::invalid_path(raw, "path is empty"));
        }

        let mut segments = Vec::new();
        for (index, segment) in raw.split(SEGMENT_SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(Error::invalid_path(
                    raw,
                    format!("segment {} is empty", index + 1),
                ));
            }
            if let Some(bad) = segment.chars().find(|c| !is_segment_char(*c)) {
                return Err(Error::invalid_path(
                    raw,
                    format!("character '{bad}' is not allowed in segment '{segment}'"),
                ));
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Returns the path segments from the root down.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the path has no segments. Parsed paths never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if `self` equals or is an ancestor of the candidate
    /// `parent.field`.
    pub(crate) fn covers(&self, parent: &[String], field: &str) -> bool {
        let depth = parent.len() + 1;
        if self.segments.len() > depth {
            return false;
        }
        self.segments
            .iter()
            .zip(candidate(parent, field))
            .all(|(ours, theirs)| ours == theirs)
    }

    /// Returns true if the candidate `parent.field` is a strict ancestor of `self`.
    pub(crate) fn descends_from(&self, parent: &[String], field: &str) -> bool {
        let depth = parent.len() + 1;
        if self.segments.len() <= depth {
            return false;
        }
        self.segments
            .iter()
            .zip(candidate(parent, field))
            .all(|(ours, theirs)| ours == theirs)
    }
}

fn candidate<'a>(parent: &'a [String], field: &'a str) -> impl Iterator<Item = &'a str> {
    parent
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(field))
}

const fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl fmt::Display for Path {
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

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// A set of [`Path`]s parsed from one raw include or exclude string.
///
/// Duplicates collapse and insertion order is irrelevant. An empty spec means
/// "nothing named"; whether that restricts anything is decided by
/// [`Mode::resolve`](crate::Mode::resolve).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSpec {
    paths: BTreeSet<Path>,
}

impl PathSpec {
    /// Creates an empty spec.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw comma-separated selection.
    ///
    /// `None`, empty and whitespace-only input yield the empty spec. Tokens are
    /// trimmed and empty tokens (`"a,,b"`, trailing commas) are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] for the first malformed token. Nothing is
    /// silently dropped: one bad path fails the whole selection.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_filter::PathSpec;
    ///
    /// let spec = PathSpec::parse(Some("accountNumber, transactions.amount"))?;
    /// assert_eq!(spec.len(), 2);
    /// assert!(PathSpec::parse(Some("a..b")).is_err());
    /// # Ok::<(), field_filter::Error>(())
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::new());
        };

        raw.split(LIST_SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Path::parse)
            .collect()
    }

    /// Builds a spec from individual path strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if any path is malformed.
    pub fn from_paths<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|p| Path::parse(p.as_ref().trim()))
            .collect()
    }

    /// Returns true if no paths were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Returns the number of distinct paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Iterates the paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter()
    }

    /// Returns true if the exact path is present.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    /// Adds a path, returning false if it was already present.
    pub fn insert(&mut self, path: Path) -> bool {
        self.paths.insert(path)
    }

    /// Merges another spec into this one.
    pub fn extend(&mut self, other: Self) {
        self.paths.extend(other.paths);
    }

    /// Returns true if some path equals `parent.field` or is an ancestor of it.
    pub(crate) fn covers(&self, parent: &[String], field: &str) -> bool {
        self.paths.iter().any(|p| p.covers(parent, field))
    }

    /// Returns true if some path lies strictly below `parent.field`.
    pub(crate) fn has_descendant_of(&self, parent: &[String], field: &str) -> bool {
        self.paths.iter().any(|p| p.descends_from(parent, field))
    }
}

impl FromIterator<Path> for PathSpec {
    fn from_iter<T: IntoIterator<Item = Path>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PathSpec {
    type Item = &'a Path;
    type IntoIter = std::collections::btree_set::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                write!(f, "{LIST_SEPARATOR}")?;
            }
            write!(f, "{path}")?;
        }
        Ok(())
    }
}

/// Parses a raw selection into a [`PathSpec`].
///
/// Shorthand for [`PathSpec::parse`].
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] if any token is malformed.
pub fn parse(raw: Option<&str>) -> Result<PathSpec> {
    PathSpec::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segs(path: &str) -> Vec<String> {
        path.split('.').map(String::from).collect()
    }

    #[test]
    fn test_parse_none_and_empty() {
        assert!(parse(None).unwrap().is_empty());
        assert!(parse(Some("")).unwrap().is_empty());
        assert!(parse(Some("  ,  , ")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_trims_and_splits() {
        let spec = parse(Some(" accountNumber , transactions.amount ")).unwrap();
        assert_eq!(spec.len(), 2);
        assert!(spec.contains(&Path::parse("accountNumber").unwrap()));

        let nested = Path::parse("transactions.amount").unwrap();
        assert!(spec.contains(&nested));
        assert_eq!(nested.segments(), &["transactions", "amount"]);
    }

    #[test]
    fn test_parse_collapses_duplicates() {
        let spec = parse(Some("a.b,a.b,a")).unwrap();
        assert_eq!(spec.len(), 2);
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for raw in ["a..b", ".a", "a.", "."] {
            let err = parse(Some(raw)).unwrap_err();
            assert!(err.is_invalid_path(), "expected failure for {raw:?}");
        }
    }

    #[test]
    fn test_parse_rejects_disallowed_characters() {
        for raw in ["a-b", "a b", "a.b$", "name;drop", "a.*"] {
            let err = parse(Some(raw)).unwrap_err();
            assert!(err.is_invalid_path(), "expected failure for {raw:?}");
        }
    }

    #[test]
    fn test_one_bad_token_fails_whole_selection() {
        let err = parse(Some("good, also_good, bad-one")).unwrap_err();
        assert!(err.to_string().contains("bad-one"));
    }

    #[test]
    fn test_underscore_and_digits_allowed() {
        let spec = parse(Some("field_1.sub2_x")).unwrap();
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_display_round_trip() {
        let spec = parse(Some("b.c, a")).unwrap();
        assert_eq!(spec.to_string(), "a,b.c");
        assert_eq!(parse(Some(&spec.to_string())).unwrap(), spec);
    }

    #[test]
    fn test_separators_are_public() {
        let raw = format!("a{}b{}c", crate::SEGMENT_SEPARATOR, crate::LIST_SEPARATOR);
        let spec = parse(Some(&raw)).unwrap();
        assert_eq!(spec.to_string(), "a.b,c");
    }

    #[test]
    fn test_covers_exact_and_ancestor() {
        let path = Path::parse("a.b").unwrap();
        assert!(path.covers(&segs("a"), "b"));
        assert!(path.covers(&segs("a.b"), "c"));
        assert!(!path.covers(&[], "a"));
        assert!(!path.covers(&segs("x"), "b"));
    }

    #[test]
    fn test_descends_from() {
        let path = Path::parse("a.b.c").unwrap();
        assert!(path.descends_from(&[], "a"));
        assert!(path.descends_from(&segs("a"), "b"));
        assert!(!path.descends_from(&segs("a.b"), "c"));
        assert!(!path.descends_from(&segs("a"), "x"));
    }

    #[test]
    fn test_from_paths() {
        let spec = PathSpec::from_paths(["a", " b.c "]).unwrap();
        assert_eq!(spec.len(), 2);
        assert!(PathSpec::from_paths(["a", ""]).is_err());
    }
}

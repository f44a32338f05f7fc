//! Extraction of raw selections from URL query strings.
//!
//! Only the transport-level unpacking happens here. Path syntax is validated
//! later by [`PathSpec::parse`](crate::PathSpec::parse).

use url::form_urlencoded;

/// Query parameter carrying the include-only selection.
pub const INCLUDE_PARAM: &str = "includeOnly";

/// Query parameter carrying the exclude-only selection.
pub const EXCLUDE_PARAM: &str = "excludeOnly";

const INCLUDE_ALIASES: &[&str] = &[INCLUDE_PARAM, "include_only"];
const EXCLUDE_ALIASES: &[&str] = &[EXCLUDE_PARAM, "exclude_only"];

/// Raw include/exclude strings as they arrived on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Comma-separated include paths, if the parameter was present
    pub include: Option<String>,
    /// Comma-separated exclude paths, if the parameter was present
    pub exclude: Option<String>,
}

impl Selection {
    /// Decodes a query string (with or without the leading `?`).
    ///
    /// Repeated parameters are joined with commas, so
    /// `includeOnly=a&includeOnly=b` is the same as `includeOnly=a,b`.
    /// Unrelated parameters are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_filter::Selection;
    ///
    /// let sel = Selection::from_query("?includeOnly=accountNumber%2Ctransactions.amount&page=2");
    /// assert_eq!(sel.include.as_deref(), Some("accountNumber,transactions.amount"));
    /// assert_eq!(sel.exclude, None);
    /// ```
    #[must_use]
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut selection = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let key: &str = &key;
            let slot = if INCLUDE_ALIASES.contains(&key) {
                &mut selection.include
            } else if EXCLUDE_ALIASES.contains(&key) {
                &mut selection.exclude
            } else {
                continue;
            };

            match slot {
                Some(existing) => {
                    existing.push(',');
                    existing.push_str(&value);
                }
                None => *slot = Some(value.into_owned()),
            }
        }

        selection
    }

    /// Returns true if both parameters carry something.
    #[must_use]
    pub fn is_conflicting(&self) -> bool {
        let present = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());
        present(&self.include) && present(&self.exclude)
    }
}

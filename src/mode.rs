use crate::path::PathSpec;
use serde::Serialize;
use std::fmt;

/// Filtering policy derived from which specs are non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Neither spec names anything: every field is emitted.
    PassThrough,
    /// The include spec names fields; everything else is dropped.
    /// A non-empty exclude spec prunes within the whitelisted subtree.
    Whitelist,
    /// Only the exclude spec names fields; those subtrees are dropped.
    Blacklist,
}

impl Mode {
    /// Resolves the active mode from the two parsed specs.
    ///
    /// Total over all four emptiness combinations:
    ///
    /// | include | exclude | mode |
    /// |---------|---------|------|
    /// | empty | empty | `PassThrough` |
    /// | non-empty | any | `Whitelist` |
    /// | empty | non-empty | `Blacklist` |
    #[must_use]
    pub fn resolve(include: &PathSpec, exclude: &PathSpec) -> Self {
        match (include.is_empty(), exclude.is_empty()) {
            (true, true) => Self::PassThrough,
            (false, _) => Self::Whitelist,
            (true, false) => Self::Blacklist,
        }
    }

    /// Returns the lowercase name used in logs and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PassThrough => "pass_through",
            Self::Whitelist => "whitelist",
            Self::Blacklist => "blacklist",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

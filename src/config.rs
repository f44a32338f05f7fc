use crate::error::{Error, Result};
use crate::path::PathSpec;
use crate::plan::FilterPlan;
use crate::query::Selection;

/// Default limit on composite nesting during a walk.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Largest accepted `max_depth`. The walk recurses once per nesting level.
pub const MAX_DEPTH_LIMIT: usize = 1024;

/// Configuration for a [`FieldFilter`](crate::FieldFilter).
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    /// Paths to include (empty means no whitelist)
    pub include: PathSpec,

    /// Paths to exclude
    pub exclude: PathSpec,

    /// Remove composites left empty after filtering
    pub prune_empty: bool,

    /// Maximum composite nesting before the walk fails
    pub max_depth: usize,

    /// Reject configurations naming both include and exclude paths
    pub reject_conflicting: bool,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_filter::Config;
    ///
    /// let config = Config::builder()
    ///     .include_only("accountNumber,transactions.transactionId")
    ///     .exclude_only("meta")
    ///     .prune_empty(true)
    ///     .build()
    ///     .expect("valid configuration");
    /// assert_eq!(config.include.len(), 2);
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Builds a configuration from a URL query string carrying
    /// `includeOnly` / `excludeOnly`.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is malformed or validation fails.
    pub fn from_query(query: &str) -> Result<Self> {
        Self::builder().selection(Selection::from_query(query)).build()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `max_depth` is zero or above [`MAX_DEPTH_LIMIT`]
    /// - both specs are non-empty while `reject_conflicting` is set
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(Error::config("max_depth must be greater than 0"));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(Error::config(format!(
                "max_depth {} exceeds the limit of {MAX_DEPTH_LIMIT}",
                self.max_depth
            )));
        }

        if self.reject_conflicting && !self.include.is_empty() && !self.exclude.is_empty() {
            return Err(Error::config(format!(
                "include ({}) and exclude ({}) cannot be combined",
                self.include, self.exclude
            )));
        }

        Ok(())
    }

    /// Builds the decision plan for these specs.
    #[must_use]
    pub fn plan(&self) -> FilterPlan {
        FilterPlan::new(self.include.clone(), self.exclude.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            include: PathSpec::new(),
            exclude: PathSpec::new(),
            prune_empty: false,
            max_depth: DEFAULT_MAX_DEPTH,
            reject_conflicting: false,
        }
    }
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    include_raw: Vec<String>,
    exclude_raw: Vec<String>,
    prune_empty: Option<bool>,
    max_depth: Option<usize>,
    reject_conflicting: bool,
}

impl ConfigBuilder {
    /// Adds a raw comma-separated include selection.
    #[must_use]
    pub fn include_only(mut self, raw: impl Into<String>) -> Self {
        self.include_raw.push(raw.into());
        self
    }

    /// Adds a raw comma-separated exclude selection.
    #[must_use]
    pub fn exclude_only(mut self, raw: impl Into<String>) -> Self {
        self.exclude_raw.push(raw.into());
        self
    }

    /// Adds individual include paths.
    #[must_use]
    pub fn include_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_raw.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds individual exclude paths.
    #[must_use]
    pub fn exclude_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_raw.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Applies raw selections extracted from a request.
    #[must_use]
    pub fn selection(mut self, selection: Selection) -> Self {
        self.include_raw.extend(selection.include);
        self.exclude_raw.extend(selection.exclude);
        self
    }

    /// Enables or disables pruning of empty composites.
    #[must_use]
    pub fn prune_empty(mut self, enabled: bool) -> Self {
        self.prune_empty = Some(enabled);
        self
    }

    /// Sets the maximum composite nesting depth.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Rejects configurations that name both include and exclude paths.
    #[must_use]
    pub fn reject_conflicting(mut self, enabled: bool) -> Self {
        self.reject_conflicting = enabled;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if any raw selection is malformed, or a
    /// configuration error if validation fails.
    pub fn build(self) -> Result<Config> {
        let config = Config {
            include: parse_all(&self.include_raw)?,
            exclude: parse_all(&self.exclude_raw)?,
            prune_empty: self.prune_empty.unwrap_or(false),
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
            reject_conflicting: self.reject_conflicting,
        };

        config.validate()?;
        Ok(config)
    }
}

fn parse_all(raw: &[String]) -> Result<PathSpec> {
    let mut spec = PathSpec::new();
    for selection in raw {
        spec.extend(PathSpec::parse(Some(selection))?);
    }
    Ok(spec)
}

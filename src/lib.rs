//! # field-filter
//!
//! Selective field visibility for serialized object graphs.
//!
//! Given a root value and two selections, "include only" and "exclude only",
//! written as comma-separated dot paths such as `account.address.city`, the
//! library decides for every reachable field at every depth whether it is
//! emitted.
//!
//! ## Features
//!
//! - Whitelist, blacklist and combined modes with exclude-over-include precedence
//! - Ancestor retention: naming `a.b.c` keeps `a` and `a.b`
//! - Path-keyed decisions: a reused shape can be visible at one path and hidden at another
//! - Identity-keyed, per-branch cycle detection for shared object graphs
//! - Optional pruning of composites left empty by filtering
//! - Filtered copies or zero-copy serialization views
//!
//! ## Quick Start
//!
//! ```
//! use field_filter::{Config, FieldFilter};
//! use serde_json::json;
//!
//! # fn main() -> field_filter::Result<()> {
//! let config = Config::builder()
//!     .include_only("accountNumber,transactions.transactionId")
//!     .exclude_only("meta")
//!     .build()?;
//!
//! let root = json!({
//!     "accountNumber": "ACC-001",
//!     "accountType": "checking",
//!     "transactions": [{"transactionId": "T1", "amount": 12.5}],
//!     "meta": {"version": 3}
//! });
//!
//! let filtered = FieldFilter::new(config)?.apply(&root)?;
//! assert_eq!(
//!     filtered.value,
//!     json!({"accountNumber": "ACC-001", "transactions": [{"transactionId": "T1"}]})
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Parser**: raw strings become [`PathSpec`]s
//! 2. **Mode resolver**: the two specs determine the [`Mode`]
//! 3. **Plan**: [`FilterPlan`] answers keep/drop for each traversal path
//! 4. **Walker**: visits any [`Inspect`] value, cutting cycles and enforcing the depth limit
//! 5. **Pruner**: optionally removes emptied composites

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod engine;
mod error;
mod mode;
mod node;
mod path;
mod plan;
mod prune;
mod query;
mod report;
mod visible;
mod walker;

pub mod graph;

pub use config::{Config, ConfigBuilder, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
pub use engine::{FieldFilter, Filtered};
pub use error::{Error, Result};
pub use mode::Mode;
pub use node::{Inspect, NodeId, View};
pub use path::{parse, Path, PathSpec, LIST_SEPARATOR, SEGMENT_SEPARATOR};
pub use plan::{FilterDecision, FilterPlan, TraversalPath};
pub use prune::prune;
pub use query::{Selection, EXCLUDE_PARAM, INCLUDE_PARAM};
pub use report::{Diagnostic, FilterReport};
pub use visible::Visible;
pub use walker::{DecisionLog, DecisionObserver, NoopObserver};

/// Filters a JSON value with raw include/exclude selections.
///
/// This is the simplest entry point. Use [`FieldFilter`] directly to reuse a
/// parsed configuration, enable pruning, or inspect the [`FilterReport`].
///
/// # Errors
///
/// Returns an error if:
/// - A selection contains a malformed path
/// - The value nests deeper than [`DEFAULT_MAX_DEPTH`]
///
/// # Examples
///
/// ```
/// use field_filter::filter;
/// use serde_json::json;
///
/// let out = filter(&json!({"a": 1, "b": {"c": 2, "d": 3}}), None, Some("b.d"))?;
/// assert_eq!(out, json!({"a": 1, "b": {"c": 2}}));
/// # Ok::<(), field_filter::Error>(())
/// ```
pub fn filter(
    root: &serde_json::Value,
    include: Option<&str>,
    exclude: Option<&str>,
) -> Result<serde_json::Value> {
    let mut builder = Config::builder();
    if let Some(include) = include {
        builder = builder.include_only(include);
    }
    if let Some(exclude) = exclude {
        builder = builder.exclude_only(exclude);
    }

    Ok(FieldFilter::new(builder.build()?)?.apply(root)?.into_value())
}

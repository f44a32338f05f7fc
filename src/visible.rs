//! Filtering at serialization time.
//!
//! [`Visible`] wraps a borrowed JSON tree and implements [`Serialize`],
//! consulting the plan for each field while the serializer emits it. No
//! filtered copy is built. Empty-composite pruning needs the finished tree
//! and is therefore not applied here.

use crate::config::{DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT};
use crate::error::Error;
use crate::plan::{FilterPlan, TraversalPath};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Serialization view of a value under a [`FilterPlan`].
///
/// # Examples
///
/// ```
/// use field_filter::{FilterPlan, PathSpec, Visible};
/// use serde_json::json;
///
/// let plan = FilterPlan::new(PathSpec::parse(Some("a"))?, PathSpec::new());
/// let value = json!({"a": 1, "b": 2});
///
/// let out = serde_json::to_string(&Visible::new(&plan, &value))?;
/// assert_eq!(out, r#"{"a":1}"#);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Visible<'a> {
    plan: &'a FilterPlan,
    value: &'a Value,
    max_depth: usize,
}

impl<'a> Visible<'a> {
    /// Creates a view with the default depth limit.
    #[must_use]
    pub const fn new(plan: &'a FilterPlan, value: &'a Value) -> Self {
        Self {
            plan,
            value,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the maximum composite nesting; deeper input fails serialization.
    ///
    /// Values above [`MAX_DEPTH_LIMIT`] are clamped to it.
    #[must_use]
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = if max_depth > MAX_DEPTH_LIMIT {
            MAX_DEPTH_LIMIT
        } else {
            max_depth
        };
        self
    }
}

impl Serialize for Visible<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let root = TraversalPath::root();
        Scoped {
            plan: self.plan,
            value: self.value,
            path: &root,
            depth: 0,
            max_depth: self.max_depth,
        }
        .serialize(serializer)
    }
}

struct Scoped<'a> {
    plan: &'a FilterPlan,
    value: &'a Value,
    path: &'a TraversalPath,
    depth: usize,
    max_depth: usize,
}

impl Scoped<'_> {
    fn check_depth<E: serde::ser::Error>(&self) -> Result<usize, E> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(E::custom(Error::max_depth(
                self.max_depth,
                self.path.to_string(),
            )));
        }
        Ok(depth)
    }
}

impl Serialize for Scoped<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Object(map) => {
                let depth = self.check_depth::<S::Error>()?;
                let kept: Vec<_> = map
                    .iter()
                    .filter(|(name, child)| {
                        let composite = matches!(child, Value::Object(_) | Value::Array(_));
                        self.plan.decide(self.path, name, composite).is_keep()
                    })
                    .collect();

                let mut out = serializer.serialize_map(Some(kept.len()))?;
                for (name, child) in kept {
                    let mut path = self.path.clone();
                    path.push(name.as_str());
                    out.serialize_entry(
                        name,
                        &Scoped {
                            plan: self.plan,
                            value: child,
                            path: &path,
                            depth,
                            max_depth: self.max_depth,
                        },
                    )?;
                }
                out.end()
            }
            Value::Array(items) => {
                let depth = self.check_depth::<S::Error>()?;
                let kept: Vec<_> = items
                    .iter()
                    .filter(|item| {
                        matches!(item, Value::Object(_) | Value::Array(_))
                            || self.plan.decide_element(self.path).is_keep()
                    })
                    .collect();

                let mut out = serializer.serialize_seq(Some(kept.len()))?;
                for item in kept {
                    out.serialize_element(&Scoped {
                        plan: self.plan,
                        value: item,
                        path: self.path,
                        depth,
                        max_depth: self.max_depth,
                    })?;
                }
                out.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathSpec;
    use serde_json::json;

    fn plan(include: &str, exclude: &str) -> FilterPlan {
        FilterPlan::new(
            PathSpec::parse(Some(include)).unwrap(),
            PathSpec::parse(Some(exclude)).unwrap(),
        )
    }

    fn render(plan: &FilterPlan, value: &Value) -> Value {
        serde_json::to_value(Visible::new(plan, value)).unwrap()
    }

    #[test]
    fn test_pass_through_serializes_everything() {
        let value = json!({"a": [1, {"b": 2}], "c": null});
        assert_eq!(render(&FilterPlan::pass_through(), &value), value);
    }

    #[test]
    fn test_whitelist_with_collections() {
        let value = json!({
            "accountNumber": "A1",
            "transactions": [{"transactionId": 1, "amount": 5}],
            "meta": {"v": 1}
        });
        assert_eq!(
            render(&plan("transactions.transactionId", ""), &value),
            json!({"transactions": [{"transactionId": 1}]})
        );
    }

    #[test]
    fn test_exclude_beneath_include() {
        let value = json!({"account": {"name": "n", "ssn": "s"}, "other": 1});
        assert_eq!(
            render(&plan("account", "account.ssn"), &value),
            json!({"account": {"name": "n"}})
        );
    }

    #[test]
    fn test_scalar_list_under_missing_child_include() {
        let value = json!({"tags": [1, 2], "items": [{"id": 1, "name": "x"}, 7]});
        assert_eq!(
            render(&plan("tags.missing,items.id", ""), &value),
            json!({"tags": [], "items": [{"id": 1}]})
        );
    }

    #[test]
    fn test_depth_limit_is_clamped() {
        let value = json!({});
        let plan = FilterPlan::pass_through();
        let view = Visible::new(&plan, &value).max_depth(usize::MAX);
        assert_eq!(view.max_depth, MAX_DEPTH_LIMIT);
    }

    #[test]
    fn test_depth_limit_fails_serialization() {
        let value = json!({"a": {"b": {"c": 1}}});
        let plan = FilterPlan::pass_through();
        let err = serde_json::to_string(&Visible::new(&plan, &value).max_depth(2)).unwrap_err();
        assert!(err.to_string().contains("Maximum depth of 2"));
    }
}

use crate::{
    config::Config,
    error::Result,
    node::Inspect,
    plan::FilterPlan,
    prune::prune,
    report::FilterReport,
    visible::Visible,
    walker::{DecisionObserver, NoopObserver, Walker},
};
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Output of one filtering invocation.
#[derive(Debug, Clone)]
pub struct Filtered {
    /// The filtered copy
    pub value: Value,

    /// Statistics and diagnostics
    pub report: FilterReport,
}

impl Filtered {
    /// Consumes the result, returning only the value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

/// Applies include/exclude selections to object graphs.
///
/// Holds no per-invocation state, so one filter can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct FieldFilter {
    config: Config,
    plan: FilterPlan,
}

impl FieldFilter {
    /// Creates a new filter with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let plan = config.plan();

        debug!(
            mode = %plan.mode(),
            include = %plan.include(),
            exclude = %plan.exclude(),
            "Filter plan resolved"
        );

        Ok(Self { config, plan })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the resolved plan.
    #[must_use]
    pub const fn plan(&self) -> &FilterPlan {
        &self.plan
    }

    /// Filters `root` and returns a new value; the input is never mutated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MaxDepthExceeded`](crate::Error::MaxDepthExceeded) if
    /// the input nests deeper than the configured limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use field_filter::{Config, FieldFilter};
    /// use serde_json::json;
    ///
    /// let filter = FieldFilter::new(Config::builder().exclude_only("meta").build()?)?;
    /// let root = json!({"accountNumber": "A1", "meta": {"v": 1}});
    ///
    /// let filtered = filter.apply(&root)?;
    /// assert_eq!(filtered.value, json!({"accountNumber": "A1"}));
    /// # Ok::<(), field_filter::Error>(())
    /// ```
    pub fn apply<N: Inspect>(&self, root: N) -> Result<Filtered> {
        self.apply_with(root, &mut NoopObserver)
    }

    /// Like [`apply`](Self::apply), additionally reporting every field
    /// decision to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MaxDepthExceeded`](crate::Error::MaxDepthExceeded) if
    /// the input nests deeper than the configured limit.
    #[instrument(skip_all, fields(mode = %self.plan.mode()))]
    pub fn apply_with<N, O>(&self, root: N, observer: &mut O) -> Result<Filtered>
    where
        N: Inspect,
        O: DecisionObserver + ?Sized,
    {
        let start_time = Instant::now();

        let outcome = Walker::new(&self.plan, self.config.max_depth, observer).walk(&root)?;
        let (value, composites_pruned) = prune(outcome.value, self.config.prune_empty);

        let report = FilterReport {
            mode: self.plan.mode(),
            fields_kept: outcome.fields_kept,
            fields_dropped: outcome.fields_dropped,
            composites_pruned,
            max_depth_seen: outcome.max_depth_seen,
            diagnostics: outcome.diagnostics,
            duration: start_time.elapsed(),
        };

        info!(
            "✓ Filtered: kept {}, dropped {}, pruned {}, cycles {} in {:.3}ms",
            report.fields_kept,
            report.fields_dropped,
            report.composites_pruned,
            report.cycles_detected(),
            report.duration.as_secs_f64() * 1000.0
        );

        Ok(Filtered { value, report })
    }

    /// Serializes `value` to a tree and filters it.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if `value` can't be represented as JSON,
    /// or any error [`apply`](Self::apply) can return.
    pub fn apply_serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<Filtered> {
        let tree = serde_json::to_value(value)?;
        self.apply(&tree)
    }

    /// Returns a zero-copy view that filters while being serialized.
    #[must_use]
    pub const fn visible<'a>(&'a self, value: &'a Value) -> Visible<'a> {
        Visible::new(&self.plan, value).max_depth(self.config.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Node, ObjectRef};
    use crate::plan::FilterDecision;
    use crate::report::Diagnostic;
    use crate::walker::DecisionLog;
    use serde_json::json;

    fn account() -> Value {
        json!({
            "accountNumber": "ACC-001",
            "accountType": "checking",
            "transactions": [
                {"transactionId": "T1", "transactionType": "debit", "amount": 12.5},
                {"transactionId": "T2", "transactionType": "credit", "amount": 40}
            ],
            "meta": {"version": 3, "source": "core"}
        })
    }

    fn filter(include: &str, exclude: &str) -> FieldFilter {
        let config = Config::builder()
            .include_only(include)
            .exclude_only(exclude)
            .build()
            .unwrap();
        FieldFilter::new(config).unwrap()
    }

    fn apply(include: &str, exclude: &str, root: &Value) -> Value {
        filter(include, exclude).apply(root).unwrap().value
    }

    #[test]
    fn test_pass_through_identity() {
        let root = account();
        assert_eq!(apply("", "", &root), root);
    }

    #[test]
    fn test_include_single_scalar() {
        assert_eq!(
            apply("accountNumber", "", &account()),
            json!({"accountNumber": "ACC-001"})
        );
    }

    #[test]
    fn test_exclude_meta() {
        let mut expected = account();
        expected.as_object_mut().unwrap().remove("meta");
        assert_eq!(apply("", "meta", &account()), expected);
    }

    #[test]
    fn test_include_collection_member() {
        assert_eq!(
            apply("transactions.transactionId", "", &account()),
            json!({"transactions": [{"transactionId": "T1"}, {"transactionId": "T2"}]})
        );
    }

    #[test]
    fn test_include_with_exclusion() {
        assert_eq!(
            apply("accountNumber,transactions.transactionId", "meta", &account()),
            json!({
                "accountNumber": "ACC-001",
                "transactions": [{"transactionId": "T1"}, {"transactionId": "T2"}]
            })
        );
    }

    #[test]
    fn test_exclude_nonexistent_is_inert() {
        let root = account();
        let filtered = filter("", "doesNotExist,meta.nothing.here").apply(&root).unwrap();
        assert_eq!(filtered.value, root);
        assert!(filtered.report.diagnostics.is_empty());
    }

    #[test]
    fn test_include_nonexistent_yields_empty() {
        assert_eq!(apply("doesNotExist", "", &account()), json!({}));
    }

    #[test]
    fn test_exclude_precedence() {
        let root = json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}});
        assert_eq!(
            apply("a.b", "a.b.c", &root),
            json!({"a": {"b": {"d": 2}}})
        );
        assert_eq!(apply("a", "a", &root), json!({}));
    }

    #[test]
    fn test_ancestor_retention_law() {
        let root = json!({"x": {"y": {"z": 1, "w": 2}, "v": 3}, "u": 4});
        let out = apply("x.y.z", "", &root);
        assert_eq!(out, json!({"x": {"y": {"z": 1}}}));
    }

    #[test]
    fn test_blacklist_removes_descendants() {
        let root = json!({"x": {"y": {"z": 1}, "v": 3}, "u": 4});
        assert_eq!(apply("", "x.y", &root), json!({"x": {"v": 3}, "u": 4}));
    }

    #[test]
    fn test_idempotence() {
        let cases = [
            ("transactions.transactionId", ""),
            ("", "meta,transactions.amount"),
            ("accountNumber,meta", "meta.source"),
            ("transactions.nothing", ""),
        ];
        for (include, exclude) in cases {
            let once = apply(include, exclude, &account());
            let twice = apply(include, exclude, &once);
            assert_eq!(once, twice, "include={include:?} exclude={exclude:?}");
        }
    }

    #[test]
    fn test_prune_flag() {
        let root = json!({"a": {"b": 1}, "c": [{"d": 1}], "e": 2});
        let keep_empty = filter("a.missing,c.missing,e", "").apply(&root).unwrap();
        assert_eq!(keep_empty.value, json!({"a": {}, "c": [{}], "e": 2}));

        let config = Config::builder()
            .include_only("a.missing,c.missing,e")
            .prune_empty(true)
            .build()
            .unwrap();
        let pruned = FieldFilter::new(config).unwrap().apply(&root).unwrap();
        assert_eq!(pruned.value, json!({"e": 2}));
        assert_eq!(pruned.report.composites_pruned, 3);
    }

    #[test]
    fn test_scalar_list_needs_its_own_path() {
        let root = json!({"accountNumber": "A1", "ssns": ["111-22-3333", "444-55-6666"]});
        assert_eq!(apply("ssns.missing", "", &root), json!({"ssns": []}));
        assert_eq!(apply("accountNumber.missing", "", &root), json!({}));
        assert_eq!(
            apply("ssns", "", &root),
            json!({"ssns": ["111-22-3333", "444-55-6666"]})
        );

        let config = Config::builder()
            .include_only("ssns.missing")
            .prune_empty(true)
            .build()
            .unwrap();
        let pruned = FieldFilter::new(config).unwrap().apply(&root).unwrap();
        assert_eq!(pruned.value, json!({}));
    }

    #[test]
    fn test_mixed_list_keeps_only_named_members() {
        let root = json!({"items": [{"id": 1, "price": 9}, 42, "sku", {"id": 2}]});
        let filter = filter("items.id", "");
        let expected = json!({"items": [{"id": 1}, {"id": 2}]});
        assert_eq!(filter.apply(&root).unwrap().value, expected);
        assert_eq!(serde_json::to_value(filter.visible(&root)).unwrap(), expected);
    }

    #[test]
    fn test_input_is_untouched() {
        let root = account();
        let before = root.clone();
        let _ = filter("accountNumber", "").apply(&root).unwrap();
        assert_eq!(root, before);
    }

    #[test]
    fn test_cycle_under_pass_through() {
        let node = ObjectRef::new().with("id", json!(1));
        node.set("next", node.clone());

        let filtered = filter("", "").apply(Node::from(node)).unwrap();
        assert_eq!(filtered.value, json!({"id": 1}));
        assert_eq!(filtered.report.cycles_detected(), 1);
        assert_eq!(
            filtered.report.diagnostics,
            [Diagnostic::CycleDetected { path: "next".to_string() }]
        );
    }

    #[test]
    fn test_reused_shape_gets_path_specific_visibility() {
        let address = ObjectRef::new()
            .with("street", json!("1 Main St"))
            .with("city", json!("Springfield"));
        let root = ObjectRef::new()
            .with("home", address.clone())
            .with("work", address);

        let filtered = filter("", "home.street").apply(Node::from(root)).unwrap();
        assert_eq!(
            filtered.value,
            json!({
                "home": {"city": "Springfield"},
                "work": {"street": "1 Main St", "city": "Springfield"}
            })
        );
        assert!(filtered.report.diagnostics.is_empty());
    }

    #[test]
    fn test_max_depth_is_an_error() {
        let config = Config::builder().max_depth(2).build().unwrap();
        let err = FieldFilter::new(config)
            .unwrap()
            .apply(&json!({"a": {"b": {"c": 1}}}))
            .unwrap_err();
        assert!(err.is_max_depth());
    }

    #[test]
    fn test_apply_with_observer() {
        let mut log = DecisionLog::new();
        filter("", "meta").apply_with(&account(), &mut log).unwrap();
        assert_eq!(log.decision_for("meta"), Some(FilterDecision::Drop));
        assert_eq!(log.decision_for("transactions.amount"), Some(FilterDecision::Keep));
    }

    #[test]
    fn test_apply_serialize() {
        #[derive(Serialize)]
        struct Account {
            number: String,
            secret: String,
        }

        let account = Account {
            number: "A1".to_string(),
            secret: "s3cr3t".to_string(),
        };
        let filtered = filter("", "secret").apply_serialize(&account).unwrap();
        assert_eq!(filtered.value, json!({"number": "A1"}));
    }

    #[test]
    fn test_visible_matches_apply() {
        let root = account();
        let filter = filter("accountNumber,transactions.amount", "");
        let streamed = serde_json::to_value(filter.visible(&root)).unwrap();
        assert_eq!(streamed, filter.apply(&root).unwrap().value);
    }

    #[test]
    fn test_report_counts() {
        let report = filter("accountNumber", "").apply(&account()).unwrap().report;
        assert_eq!(report.fields_kept, 1);
        assert_eq!(report.fields_dropped, 3);
        assert_eq!(report.max_depth_seen, 1);
    }

    #[test]
    fn test_filter_shared_across_threads() {
        let filter = std::sync::Arc::new(filter("accountNumber", ""));
        let root = std::sync::Arc::new(account());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let filter = std::sync::Arc::clone(&filter);
                let root = std::sync::Arc::clone(&root);
                std::thread::spawn(move || filter.apply(root.as_ref()).unwrap().value)
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), json!({"accountNumber": "ACC-001"}));
        }
    }
}

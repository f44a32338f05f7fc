//! Depth-first graph walk.
//!
//! The walker consults the [`FilterPlan`] for every object field and every
//! scalar collection element, copies kept scalars, and descends into kept
//! composites. Cycle detection uses the
//! identities of the composites on the active branch only: an object reached
//! twice through sibling paths (a diamond) is walked twice, while an object
//! reached from itself is cut.

use crate::error::{Error, Result};
use crate::node::{Inspect, NodeId, View};
use crate::plan::{FilterDecision, FilterPlan, TraversalPath};
use crate::report::Diagnostic;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{trace, warn};

/// Receives one callback per decided field.
///
/// Lets an external serializer follow the walk instead of (or as well as)
/// consuming the filtered copy.
pub trait DecisionObserver {
    /// Called with the full dotted path of a field and its final decision.
    fn on_decision(&mut self, path: &str, decision: FilterDecision);
}

impl<F> DecisionObserver for F
where
    F: FnMut(&str, FilterDecision),
{
    fn on_decision(&mut self, path: &str, decision: FilterDecision) {
        self(path, decision);
    }
}

/// Observer that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DecisionObserver for NoopObserver {
    fn on_decision(&mut self, _path: &str, _decision: FilterDecision) {}
}

/// Observer that records every decision in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionLog {
    entries: Vec<(String, FilterDecision)>,
}

impl DecisionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded `(path, decision)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(String, FilterDecision)] {
        &self.entries
    }

    /// Returns the decision recorded for `path`, if any.
    #[must_use]
    pub fn decision_for(&self, path: &str) -> Option<FilterDecision> {
        self.entries
            .iter()
            .find_map(|(p, d)| (p == path).then_some(*d))
    }
}

impl DecisionObserver for DecisionLog {
    fn on_decision(&mut self, path: &str, decision: FilterDecision) {
        self.entries.push((path.to_string(), decision));
    }
}

/// Result of one walk, before pruning.
#[derive(Debug, Clone)]
pub(crate) struct WalkOutcome {
    pub(crate) value: Value,
    pub(crate) fields_kept: usize,
    pub(crate) fields_dropped: usize,
    pub(crate) max_depth_seen: usize,
    pub(crate) diagnostics: Vec<Diagnostic>,
}

/// Walk state for one invocation. Nothing here outlives the call.
pub(crate) struct Walker<'a, O: ?Sized> {
    plan: &'a FilterPlan,
    observer: &'a mut O,
    max_depth: usize,
    path: TraversalPath,
    visited: HashSet<NodeId>,
    depth: usize,
    max_depth_seen: usize,
    fields_kept: usize,
    fields_dropped: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a, O> Walker<'a, O>
where
    O: DecisionObserver + ?Sized,
{
    pub(crate) fn new(plan: &'a FilterPlan, max_depth: usize, observer: &'a mut O) -> Self {
        Self {
            plan,
            observer,
            max_depth,
            path: TraversalPath::root(),
            visited: HashSet::new(),
            depth: 0,
            max_depth_seen: 0,
            fields_kept: 0,
            fields_dropped: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Walks `root` and builds the filtered copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MaxDepthExceeded`] if composites nest deeper than the
    /// configured limit.
    pub(crate) fn walk<N: Inspect>(mut self, root: &N) -> Result<WalkOutcome> {
        let value = self.visit(root)?;
        Ok(WalkOutcome {
            value,
            fields_kept: self.fields_kept,
            fields_dropped: self.fields_dropped,
            max_depth_seen: self.max_depth_seen,
            diagnostics: self.diagnostics,
        })
    }

    fn visit<N: Inspect>(&mut self, node: &N) -> Result<Value> {
        match node.view() {
            View::Scalar(value) => Ok(value),
            View::Object(fields) => self.enter(node.identity(), |walker| walker.visit_object(fields)),
            View::Sequence(items) => self.enter(node.identity(), |walker| walker.visit_sequence(items)),
        }
    }

    /// Runs `body` with the composite pushed on the active branch.
    fn enter<F>(&mut self, id: Option<NodeId>, body: F) -> Result<Value>
    where
        F: FnOnce(&mut Self) -> Result<Value>,
    {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::max_depth(self.max_depth, self.path.to_string()));
        }
        self.max_depth_seen = self.max_depth_seen.max(self.depth);

        if let Some(id) = id {
            self.visited.insert(id);
        }
        let result = body(self);
        if let Some(id) = id {
            self.visited.remove(&id);
        }

        self.depth -= 1;
        result
    }

    fn visit_object<N: Inspect>(&mut self, fields: Vec<(String, N)>) -> Result<Value> {
        let mut out = Map::with_capacity(fields.len());

        for (name, child) in fields {
            let composite = child.is_composite();
            let mut decision = self.plan.decide(&self.path, &name, composite);

            if decision.is_keep() && composite && self.is_on_branch(&child) {
                self.record_cycle(self.path.child(&name));
                decision = FilterDecision::Drop;
            }

            let full_path = self.path.child(&name);
            trace!(path = %full_path, ?decision, "field decided");
            self.observer.on_decision(&full_path, decision);

            if !decision.is_keep() {
                self.fields_dropped += 1;
                continue;
            }
            self.fields_kept += 1;

            let value = if self.plan.should_descend(&self.path, &name, composite) {
                self.path.push(name.clone());
                let result = self.visit(&child);
                self.path.pop();
                result?
            } else {
                self.visit(&child)?
            };
            out.insert(name, value);
        }

        Ok(Value::Object(out))
    }

    fn visit_sequence<N: Inspect>(&mut self, items: Vec<N>) -> Result<Value> {
        let mut out = Vec::with_capacity(items.len());

        for item in items {
            if !item.is_composite() {
                if self.plan.decide_element(&self.path).is_keep() {
                    out.push(self.visit(&item)?);
                }
                continue;
            }
            if self.is_on_branch(&item) {
                let path = self.path.to_string();
                self.observer.on_decision(&path, FilterDecision::Drop);
                self.fields_dropped += 1;
                self.record_cycle(path);
                continue;
            }
            out.push(self.visit(&item)?);
        }

        Ok(Value::Array(out))
    }

    fn is_on_branch<N: Inspect>(&self, node: &N) -> bool {
        node.identity().is_some_and(|id| self.visited.contains(&id))
    }

    fn record_cycle(&mut self, path: String) {
        warn!(path = %path, "cycle detected, dropping edge");
        self.diagnostics.push(Diagnostic::CycleDetected { path });
    }
}

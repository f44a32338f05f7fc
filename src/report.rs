use crate::mode::Mode;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Non-fatal finding recorded during a walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Diagnostic {
    /// A composite was reachable from itself; the edge at `path` was dropped.
    CycleDetected {
        /// Dotted path of the dropped edge
        path: String,
    },
}

impl Diagnostic {
    /// Returns the path the diagnostic refers to.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::CycleDetected { path } => path,
        }
    }

    /// Returns true if this is a cycle diagnostic.
    #[must_use]
    pub const fn is_cycle(&self) -> bool {
        matches!(self, Self::CycleDetected { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected { path } if path.is_empty() => {
                write!(f, "cycle detected at root")
            }
            Self::CycleDetected { path } => write!(f, "cycle detected at '{path}'"),
        }
    }
}

/// Statistics collected during one filtering invocation.
#[derive(Debug, Clone, Serialize)]
pub struct FilterReport {
    /// Mode the plan resolved to
    pub mode: Mode,

    /// Object fields emitted
    pub fields_kept: usize,

    /// Object fields omitted, plus cycle edges cut in objects or lists
    pub fields_dropped: usize,

    /// Empty composites removed by pruning
    pub composites_pruned: usize,

    /// Deepest composite nesting reached (root is 1)
    pub max_depth_seen: usize,

    /// Non-fatal findings, in walk order
    pub diagnostics: Vec<Diagnostic>,

    /// Total execution time
    pub duration: Duration,
}

impl FilterReport {
    /// Number of cycle edges that were cut.
    #[must_use]
    pub fn cycles_detected(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_cycle()).count()
    }

    /// Fraction of decided fields that were kept (1.0 when nothing was decided).
    #[must_use]
    pub fn keep_ratio(&self) -> f64 {
        let total = self.fields_kept + self.fields_dropped;
        if total == 0 {
            return 1.0;
        }
        self.fields_kept as f64 / total as f64
    }

    /// Prints a human-readable summary to stderr.
    pub fn print_summary(&self) {
        eprintln!("\n╔═══════════════════════════════════════════════════════╗");
        eprintln!("║              Field Filter Summary                     ║");
        eprintln!("╠═══════════════════════════════════════════════════════╣");
        eprintln!("║ Mode:                 {:>12}                    ║", self.mode.as_str());
        eprintln!("║ Fields Kept:          {:>8}                        ║", self.fields_kept);
        eprintln!("║ Fields Dropped:       {:>8}                        ║", self.fields_dropped);
        eprintln!("║ Composites Pruned:    {:>8}                        ║", self.composites_pruned);
        eprintln!("║ Max Depth:            {:>8}                        ║", self.max_depth_seen);
        eprintln!("║ Cycles Cut:           {:>8}                        ║", self.cycles_detected());
        eprintln!(
            "║ Duration:             {:>8.3}ms                      ║",
            self.duration.as_secs_f64() * 1000.0
        );
        for diagnostic in &self.diagnostics {
            eprintln!("║   - {diagnostic}");
        }
        eprintln!("╚═══════════════════════════════════════════════════════╝\n");
    }
}

//! Search statistics tracking.

use std::time::{Duration, Instant};

use tracing::debug;

/// Statistics collected during one search.
#[derive(Clone, Debug)]
pub struct SearchStats {
    /// Nodes visited, leaves and passes included
    pub nodes: u64,

    /// Nodes scored by the evaluator (depth exhausted or game over)
    pub leaves: u64,

    /// Branches cut off by alpha-beta
    pub cutoffs: u64,

    /// Nodes where the side to move had no legal move
    pub passes: u64,

    /// Deepest iteration that ran to completion
    pub completed_depth: u32,

    start_time: Instant,
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStats {
    pub fn new() -> Self {
        Self {
            nodes: 0,
            leaves: 0,
            cutoffs: 0,
            passes: 0,
            completed_depth: 0,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Get current nodes per second
    pub fn nodes_per_sec(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.nodes as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Fraction of visited nodes that caused a cutoff, as a percentage.
    pub fn cutoff_pct(&self) -> f64 {
        if self.nodes > 0 {
            100.0 * self.cutoffs as f64 / self.nodes as f64
        } else {
            0.0
        }
    }

    /// Emit a one-line summary at debug level.
    pub fn log_summary(&self) {
        debug!(
            nodes = self.nodes,
            leaves = self.leaves,
            cutoffs = self.cutoffs,
            passes = self.passes,
            depth = self.completed_depth,
            "searched in {:.3}s ({:.0} nodes/s, {:.1}% cutoffs)",
            self.elapsed().as_secs_f64(),
            self.nodes_per_sec(),
            self.cutoff_pct(),
        );
    }
}

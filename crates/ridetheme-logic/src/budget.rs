//! Run-wide visited set and piece budget.

use std::collections::HashSet;

use crate::grid::GridCoord;

/// Outcome of offering a candidate tile to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Already decided earlier in this run; nothing changes.
    Seen,
    /// Budget is spent; the whole run must stop.
    Exhausted,
    /// Newly marked visited; go on to sampling and checks.
    Fresh,
}

/// Shared across every anchor of one run, never across runs.
#[derive(Debug, Clone)]
pub struct BudgetTracker {
    visited: HashSet<GridCoord>,
    remaining: u32,
}

impl BudgetTracker {
    pub fn new(max_pieces: u32) -> Self {
        Self {
            visited: HashSet::new(),
            remaining: max_pieces,
        }
    }

    /// Mark `at` visited, then report whether the run may continue.
    ///
    /// The tile is marked even when the budget is already spent.
    pub fn visit(&mut self, at: GridCoord) -> Visit {
        if !self.visited.insert(at) {
            return Visit::Seen;
        }
        if self.remaining == 0 {
            return Visit::Exhausted;
        }
        Visit::Fresh
    }

    /// Consume one piece. Call only after the host accepted a placement.
    pub fn record_placement(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn was_visited(&self, at: GridCoord) -> bool {
        self.visited.contains(&at)
    }
}

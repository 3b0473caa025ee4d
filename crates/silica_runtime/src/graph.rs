//! Combinational fixpoint tracking.
//!
//! Each module has a [`CombGraph`] with one pending flag per combinational
//! process. During a settle pass, every process runs and records whether any
//! of its outputs changed; the graph is stabilized exactly when a full pass
//! recorded no changes. Slots start pending so a freshly elaborated module
//! always gets at least one evaluation pass.
//!
//! Graphs live in a scheduler-owned table keyed by module ID (modules hold
//! only slot indices), which keeps graph ownership unambiguous and lets the
//! scheduler report the offending module path when settling fails.

/// Per-module pending state for combinational processes.
#[derive(Debug, Clone, Default)]
pub struct CombGraph {
    pending: Vec<bool>,
}

impl CombGraph {
    /// Creates a graph with no processes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a process slot, initially pending.
    pub fn add_slot(&mut self) -> usize {
        self.pending.push(true);
        self.pending.len() - 1
    }

    /// Records the outcome of one evaluation of the process in `slot`:
    /// `changed == true` keeps the slot pending for another pass.
    ///
    /// # Panics
    ///
    /// Panics if `slot` was never added.
    pub fn record(&mut self, slot: usize, changed: bool) {
        self.pending[slot] = changed;
    }

    /// Returns `true` when no process slot is pending, i.e. the last full
    /// pass produced zero changes.
    pub fn stabilized(&self) -> bool {
        !self.pending.iter().any(|&p| p)
    }

    /// Returns the number of registered process slots.
    pub fn slot_count(&self) -> usize {
        self.pending.len()
    }
}

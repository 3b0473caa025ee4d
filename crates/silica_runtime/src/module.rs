//! The module lifecycle contract.
//!
//! Every generated module type implements [`ModuleKernel`]: five region
//! operations, each receiving the scheduler handle, with default no-op
//! bodies so a module only writes the regions it uses. The scheduler calls
//! the root module; a module with children calls their region methods after
//! running its own processes, and must use the same traversal order for
//! `comb`, `ff`, and `nba` within a delta cycle.
//!
//! Region semantics per delta cycle:
//! - `comb` runs once per settle pass, repeatedly, until every module's
//!   combinational graph stabilizes. Each combinational process must record
//!   its changed/settled outcome every pass.
//! - `ff` runs once, strictly after settling: clocked processes whose wake
//!   callback triggered sample their inputs and stage results.
//! - `nba` runs once, strictly after `ff`: staged results become visible to
//!   readers. Anything that read the target during `ff` saw the old value.
//!   The scheduler settles the combinational region again afterwards, so
//!   published values propagate before the delta cycle ends.

use crate::error::SimError;
use crate::scheduler::Scheduler;

/// Lifecycle operations of one module instance.
///
/// Module identity lives in the scheduler: registration hands out the
/// [`ModuleId`](crate::hierarchy::ModuleId)s that processes and callbacks
/// are keyed by, so the trait itself is purely behavioral.
pub trait ModuleKernel {
    /// Runs once per module at simulation start, before the first delta
    /// cycle. Initial assignments and timed-event setup belong here.
    fn init(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
        Ok(())
    }

    /// One combinational evaluation pass (the active region).
    fn comb(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
        Ok(())
    }

    /// The clocked-update region.
    fn ff(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
        Ok(())
    }

    /// The non-blocking publication region.
    fn nba(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
        Ok(())
    }

    /// Runs once per module at simulation end, after the last delta cycle,
    /// even when the run was ended by `finish`.
    fn finalize(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
        Ok(())
    }
}

//! Runtime failure taxonomy.
//!
//! Every variant of [`SimError`] is fatal for the current run. A partially
//! evaluated delta cycle would silently produce a wrong waveform, so there
//! is no skip-and-continue path: elaboration errors abort model
//! construction, and stabilization or scheduling errors abort the run
//! before time advances past the broken step.

use crate::time::SimTime;

/// Errors raised during model elaboration or simulation execution.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A second module was registered without a parent.
    #[error("hierarchy already has root {root:?}; module {inst:?} must name a parent")]
    SecondRoot {
        /// Instance name of the existing root.
        root: String,
        /// Instance name of the offending registration.
        inst: String,
    },

    /// A module named a parent ID the hierarchy never issued.
    #[error("module {inst:?} refers to an unregistered parent")]
    UnknownParent {
        /// Instance name of the offending registration.
        inst: String,
    },

    /// An assignment between values of different bit widths.
    #[error("width mismatch in assignment: target has {target} bits, value has {found}")]
    WidthMismatch {
        /// Bit width of the assignment target.
        target: u32,
        /// Bit width of the assigned value.
        found: u32,
    },

    /// A module's combinational logic never reached a fixpoint.
    #[error("combinational logic in {path} failed to stabilize after {passes} passes")]
    Unstable {
        /// Hierarchy path of the offending module.
        path: String,
        /// Number of settle passes executed before giving up.
        passes: u32,
    },

    /// The same simulation time kept re-triggering evaluation without bound.
    #[error("delta cycle limit reached at {time}: {max} cycles without settling")]
    DeltaLimit {
        /// The simulation time that refused to settle.
        time: SimTime,
        /// The configured delta-cycle limit.
        max: u32,
    },
}

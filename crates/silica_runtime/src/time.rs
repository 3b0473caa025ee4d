//! Simulation time with femtosecond resolution.
//!
//! The scheduler's clock is a single monotonically non-decreasing
//! femtosecond counter. Delta cycles (re-evaluation passes at a fixed time)
//! are sequenced by the scheduler's same-time loop, so events only need
//! wall-clock ordering and [`SimTime`] carries no delta index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;

/// A point in simulation time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SimTime {
    fs: u64,
}

impl SimTime {
    /// Time zero, where every simulation starts.
    pub const ZERO: SimTime = SimTime { fs: 0 };

    /// Creates a time from a femtosecond count.
    pub fn from_fs(fs: u64) -> Self {
        Self { fs }
    }

    /// Creates a time from a picosecond count.
    pub fn from_ps(ps: u64) -> Self {
        Self { fs: ps * FS_PER_PS }
    }

    /// Creates a time from a nanosecond count.
    pub fn from_ns(ns: u64) -> Self {
        Self { fs: ns * FS_PER_NS }
    }

    /// Returns the femtosecond count.
    pub fn as_fs(self) -> u64 {
        self.fs
    }

    /// Returns the time truncated to whole nanoseconds.
    pub fn as_ns(self) -> u64 {
        self.fs / FS_PER_NS
    }

    /// Returns this time shifted later by `fs` femtoseconds.
    pub fn offset_fs(self, fs: u64) -> Self {
        Self { fs: self.fs + fs }
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.fs;
        if fs == 0 {
            write!(f, "0 fs")
        } else if fs % FS_PER_US == 0 {
            write!(f, "{} us", fs / FS_PER_US)
        } else if fs % FS_PER_NS == 0 {
            write!(f, "{} ns", fs / FS_PER_NS)
        } else if fs % FS_PER_PS == 0 {
            write!(f, "{} ps", fs / FS_PER_PS)
        } else {
            write!(f, "{fs} fs")
        }
    }
}

//! Simulation signal values with change tracking and edge sensitivity.
//!
//! [`LogicValue`] is the storage type generated code uses for every signal:
//! a four-state vector with a declared bit range and signedness, a
//! transient `changed` flag, and posedge/negedge callback lists. Assignment
//! compares before storing — an equal value clears `changed` and does
//! nothing else, which is what lets the combinational fixpoint loop
//! terminate and keeps dependent processes from re-triggering spuriously.
//!
//! Edge detection applies to one-bit values only. A detected edge never
//! invokes callbacks inline; the callback list is handed to the scheduler's
//! enqueue capability and fires in a later evaluation pass.

use silica_common::{Logic, LogicVector};

use crate::error::SimError;
use crate::scheduler::{CallbackId, CallbackSink};

/// A four-state signal value with a declared bit range.
#[derive(Debug, Clone)]
pub struct LogicValue {
    msb: i32,
    lsb: i32,
    signed: bool,
    bits: LogicVector,
    /// Outcome of the most recent assignment only, not accumulated history.
    changed: bool,
    posedge: Vec<CallbackId>,
    negedge: Vec<CallbackId>,
}

impl LogicValue {
    /// Creates a value with the given bit range and signedness, initialized
    /// to all-X. Construction counts as a pending change so the first
    /// settle pass propagates initial values.
    pub fn new(msb: i32, lsb: i32, signed: bool) -> Self {
        let width = msb.abs_diff(lsb) + 1;
        Self {
            msb,
            lsb,
            signed,
            bits: LogicVector::all_x(width),
            changed: true,
            posedge: Vec::new(),
            negedge: Vec::new(),
        }
    }

    /// Creates a one-bit unsigned value (`[0:0]`).
    pub fn scalar() -> Self {
        Self::new(0, 0, false)
    }

    /// Creates an unsigned value spanning `[msb:lsb]`.
    pub fn vector(msb: i32, lsb: i32) -> Self {
        Self::new(msb, lsb, false)
    }

    /// Returns the bit width of the declared range.
    pub fn width(&self) -> u32 {
        self.msb.abs_diff(self.lsb) + 1
    }

    /// Most significant declared index.
    pub fn msb(&self) -> i32 {
        self.msb
    }

    /// Least significant declared index.
    pub fn lsb(&self) -> i32 {
        self.lsb
    }

    /// Returns `true` for signed values.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// The current stored bits.
    pub fn value(&self) -> &LogicVector {
        &self.bits
    }

    /// Whether the most recent assignment stored a different value.
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Registers a callback to fire on a rising edge. Meaningful only for
    /// one-bit values; wider values never fire edges.
    pub fn on_posedge(&mut self, callback: CallbackId) {
        self.posedge.push(callback);
    }

    /// Registers a callback to fire on a falling edge.
    pub fn on_negedge(&mut self, callback: CallbackId) {
        self.negedge.push(callback);
    }

    /// Assigns a new value of the same width.
    ///
    /// Equal values clear `changed` and return without side effects.
    /// Different values are stored with `changed` set; for one-bit values a
    /// transition to 1 from anything else (including X and Z) enqueues the
    /// posedge list through `sink`, and symmetrically to 0 for the negedge
    /// list. A width mismatch is an elaboration error and leaves the value
    /// and its `changed` flag untouched.
    pub fn assign(
        &mut self,
        next: &LogicVector,
        sink: &mut impl CallbackSink,
    ) -> Result<(), SimError> {
        if next.width() != self.width() {
            return Err(SimError::WidthMismatch {
                target: self.width(),
                found: next.width(),
            });
        }
        if *next == self.bits {
            self.changed = false;
            return Ok(());
        }
        if self.width() == 1 {
            let was = self.bits.get(0);
            let now = next.get(0);
            if now == Logic::One && was != Logic::One && !self.posedge.is_empty() {
                sink.schedule_callbacks(&self.posedge);
            } else if now == Logic::Zero && was != Logic::Zero && !self.negedge.is_empty() {
                sink.schedule_callbacks(&self.negedge);
            }
        }
        self.bits = next.clone();
        self.changed = true;
        Ok(())
    }

    /// Assigns from another value of the same width.
    pub fn assign_from(
        &mut self,
        other: &LogicValue,
        sink: &mut impl CallbackSink,
    ) -> Result<(), SimError> {
        let bits = other.bits.clone();
        self.assign(&bits, sink)
    }

    /// Assigns the low bits of a `u64`, widened or masked to this width.
    pub fn assign_u64(&mut self, value: u64, sink: &mut impl CallbackSink) -> Result<(), SimError> {
        let next = LogicVector::from_u64(value, self.width());
        self.assign(&next, sink)
    }

    /// Assigns a single logic state to a one-bit value.
    pub fn assign_bit(&mut self, bit: Logic, sink: &mut impl CallbackSink) -> Result<(), SimError> {
        let mut next = LogicVector::zeros(1);
        next.set(0, bit);
        self.assign(&next, sink)
    }
}

//! Packed four-state bit vectors.
//!
//! [`LogicVector`] stores a fixed-width run of [`Logic`] values in two bit
//! planes per 64-bit word: a value plane and an unknown plane. A bit with a
//! clear unknown-plane bit is a definite 0/1 from the value plane; a set
//! unknown-plane bit selects X or Z. This keeps definite-valued vectors
//! cheap to compare and convert, which the simulation kernel relies on for
//! its compare-before-store assignment path.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

const WORD_BITS: u32 = 64;

/// A fixed-width vector of four-state logic values.
///
/// Bit index 0 is the least significant bit. All storage beyond `width`
/// is kept zeroed so that derived equality and hashing are exact.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicVector {
    width: u32,
    /// Value plane: the 0/1 payload of each definite bit.
    value: Vec<u64>,
    /// Unknown plane: set selects X (value bit clear) or Z (value bit set).
    unknown: Vec<u64>,
}

impl LogicVector {
    /// Creates a vector of the given width with every bit driven to 0.
    pub fn zeros(width: u32) -> Self {
        let words = word_count(width);
        Self {
            width,
            value: vec![0; words],
            unknown: vec![0; words],
        }
    }

    /// Creates a vector of the given width with every bit unknown (X).
    pub fn all_x(width: u32) -> Self {
        let words = word_count(width);
        let mut unknown = vec![u64::MAX; words];
        mask_tail(&mut unknown, width);
        Self {
            width,
            value: vec![0; words],
            unknown,
        }
    }

    /// Creates a one-bit vector from a boolean.
    pub fn from_bool(value: bool) -> Self {
        let mut v = Self::zeros(1);
        v.set(0, Logic::from(value));
        v
    }

    /// Creates a vector of the given width from the low bits of a `u64`.
    ///
    /// Bits of `value` at or above `width` are discarded.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let mut v = Self::zeros(width);
        if width > 0 {
            let keep = if width >= 64 {
                value
            } else {
                value & ((1u64 << width) - 1)
            };
            v.value[0] = keep;
        }
        v
    }

    /// Parses a binary string such as `"1X0Z"`, leftmost character most
    /// significant. Returns `None` on characters outside `01xXzZ`.
    pub fn from_binary_str(s: &str) -> Option<Self> {
        let width = s.chars().count() as u32;
        let mut v = Self::zeros(width);
        for (i, c) in s.chars().rev().enumerate() {
            v.set(i as u32, Logic::from_char(c)?);
        }
        Some(v)
    }

    /// Returns the number of bits in this vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Reads the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width,
            "bit {index} out of range for width {}",
            self.width
        );
        let word = (index / WORD_BITS) as usize;
        let bit = index % WORD_BITS;
        let v = (self.value[word] >> bit) & 1;
        let u = (self.unknown[word] >> bit) & 1;
        match (u, v) {
            (0, 0) => Logic::Zero,
            (0, 1) => Logic::One,
            (1, 0) => Logic::X,
            _ => Logic::Z,
        }
    }

    /// Writes the bit at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, bit: Logic) {
        assert!(
            index < self.width,
            "bit {index} out of range for width {}",
            self.width
        );
        let word = (index / WORD_BITS) as usize;
        let pos = index % WORD_BITS;
        let (u, v) = match bit {
            Logic::Zero => (0u64, 0u64),
            Logic::One => (0, 1),
            Logic::X => (1, 0),
            Logic::Z => (1, 1),
        };
        self.value[word] = (self.value[word] & !(1 << pos)) | (v << pos);
        self.unknown[word] = (self.unknown[word] & !(1 << pos)) | (u << pos);
    }

    /// Returns `true` when every bit is a definite 0 or 1.
    pub fn is_known(&self) -> bool {
        self.unknown.iter().all(|&w| w == 0)
    }

    /// Converts to a `u64` when every bit is definite and the width fits.
    pub fn to_u64(&self) -> Option<u64> {
        if self.width > 64 || !self.is_known() {
            return None;
        }
        Some(self.value.first().copied().unwrap_or(0))
    }

    /// Returns `true` for a one-bit vector currently holding logic 1.
    pub fn is_one(&self) -> bool {
        self.width == 1 && self.get(0) == Logic::One
    }

    /// Returns `true` for a one-bit vector currently holding logic 0.
    pub fn is_zero(&self) -> bool {
        self.width == 1 && self.get(0) == Logic::Zero
    }
}

impl fmt::Display for LogicVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.width).rev() {
            write!(f, "{}", self.get(i))?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicVector({self})")
    }
}

impl BitAnd for &LogicVector {
    type Output = LogicVector;

    fn bitand(self, rhs: Self) -> LogicVector {
        binary_op(self, rhs, "AND", |a, b| a & b)
    }
}

impl BitOr for &LogicVector {
    type Output = LogicVector;

    fn bitor(self, rhs: Self) -> LogicVector {
        binary_op(self, rhs, "OR", |a, b| a | b)
    }
}

impl BitXor for &LogicVector {
    type Output = LogicVector;

    fn bitxor(self, rhs: Self) -> LogicVector {
        binary_op(self, rhs, "XOR", |a, b| a ^ b)
    }
}

impl Not for &LogicVector {
    type Output = LogicVector;

    fn not(self) -> LogicVector {
        let mut out = LogicVector::zeros(self.width);
        for i in 0..self.width {
            out.set(i, !self.get(i));
        }
        out
    }
}

fn binary_op(
    lhs: &LogicVector,
    rhs: &LogicVector,
    op: &str,
    f: impl Fn(Logic, Logic) -> Logic,
) -> LogicVector {
    assert_eq!(
        lhs.width, rhs.width,
        "width mismatch in {op}: {} vs {}",
        lhs.width, rhs.width
    );
    let mut out = LogicVector::zeros(lhs.width);
    for i in 0..lhs.width {
        out.set(i, f(lhs.get(i), rhs.get(i)));
    }
    out
}

fn word_count(width: u32) -> usize {
    width.div_ceil(WORD_BITS) as usize
}

/// Clears plane bits at and above `width` in the last word.
fn mask_tail(words: &mut [u64], width: u32) {
    let rem = width % WORD_BITS;
    if rem != 0 {
        if let Some(last) = words.last_mut() {
            *last &= (1u64 << rem) - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_is_all_zero() {
        let v = LogicVector::zeros(70);
        for i in 0..70 {
            assert_eq!(v.get(i), Logic::Zero);
        }
    }

    #[test]
    fn all_x_is_all_unknown() {
        let v = LogicVector::all_x(70);
        for i in 0..70 {
            assert_eq!(v.get(i), Logic::X);
        }
        assert!(!v.is_known());
    }

    #[test]
    fn set_get_all_states() {
        let mut v = LogicVector::zeros(4);
        v.set(0, Logic::Zero);
        v.set(1, Logic::One);
        v.set(2, Logic::X);
        v.set(3, Logic::Z);
        assert_eq!(v.get(0), Logic::Zero);
        assert_eq!(v.get(1), Logic::One);
        assert_eq!(v.get(2), Logic::X);
        assert_eq!(v.get(3), Logic::Z);
    }

    #[test]
    fn from_u64_masks_high_bits() {
        let v = LogicVector::from_u64(0b1111_0101, 4);
        assert_eq!(v.to_u64(), Some(0b0101));
    }

    #[test]
    fn to_u64_rejects_unknowns() {
        let mut v = LogicVector::from_u64(3, 4);
        assert_eq!(v.to_u64(), Some(3));
        v.set(2, Logic::X);
        assert_eq!(v.to_u64(), None);
    }

    #[test]
    fn from_binary_str_msb_first() {
        let v = LogicVector::from_binary_str("1X0Z").unwrap();
        assert_eq!(v.width(), 4);
        assert_eq!(v.get(3), Logic::One);
        assert_eq!(v.get(2), Logic::X);
        assert_eq!(v.get(1), Logic::Zero);
        assert_eq!(v.get(0), Logic::Z);
        assert!(LogicVector::from_binary_str("10?1").is_none());
    }

    #[test]
    fn display_matches_parse() {
        let v = LogicVector::from_binary_str("Z01X").unwrap();
        assert_eq!(v.to_string(), "Z01X");
    }

    #[test]
    fn equality_ignores_nothing() {
        let a = LogicVector::from_u64(9, 8);
        let b = LogicVector::from_u64(9, 8);
        let c = LogicVector::from_u64(8, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, LogicVector::from_u64(9, 9));
    }

    #[test]
    fn scalar_predicates() {
        assert!(LogicVector::from_bool(true).is_one());
        assert!(LogicVector::from_bool(false).is_zero());
        let x = LogicVector::all_x(1);
        assert!(!x.is_one());
        assert!(!x.is_zero());
        // width > 1 is never treated as scalar
        assert!(!LogicVector::from_u64(1, 2).is_one());
    }

    #[test]
    fn bitwise_ops() {
        let a = LogicVector::from_binary_str("1100").unwrap();
        let b = LogicVector::from_binary_str("1010").unwrap();
        assert_eq!((&a & &b).to_string(), "1000");
        assert_eq!((&a | &b).to_string(), "1110");
        assert_eq!((&a ^ &b).to_string(), "0110");
        assert_eq!((!&a).to_string(), "0011");
    }

    #[test]
    fn bitwise_unknown_pessimism() {
        let a = LogicVector::from_binary_str("X1").unwrap();
        let b = LogicVector::from_binary_str("01").unwrap();
        assert_eq!((&a & &b).to_string(), "01");
        assert_eq!((&a | &b).to_string(), "X1");
    }

    #[test]
    fn wide_vector_word_boundary() {
        let mut v = LogicVector::zeros(130);
        v.set(63, Logic::One);
        v.set(64, Logic::Z);
        v.set(129, Logic::X);
        assert_eq!(v.get(63), Logic::One);
        assert_eq!(v.get(64), Logic::Z);
        assert_eq!(v.get(129), Logic::X);
    }

    #[test]
    fn serde_roundtrip() {
        let v = LogicVector::from_binary_str("10XZ01").unwrap();
        let json = serde_json::to_string(&v).unwrap();
        let back: LogicVector = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}

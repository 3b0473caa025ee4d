//! Four-state scalar logic values.
//!
//! Simulation signals carry values from {0, 1, X, Z}: driven low, driven
//! high, unknown, and high-impedance. Operators follow the IEEE 1164
//! resolution rules, so any computation touching an X or Z degrades
//! pessimistically instead of inventing a definite bit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// One four-state logic bit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Logic {
    /// Driven low.
    Zero = 0,
    /// Driven high.
    One = 1,
    /// Unknown or uninitialized.
    X = 2,
    /// High-impedance (not driven).
    Z = 3,
}

impl Logic {
    /// Returns `true` for the two definite states (`Zero` and `One`).
    pub fn is_known(self) -> bool {
        matches!(self, Logic::Zero | Logic::One)
    }

    /// Parses a single value character: `0`, `1`, `x`/`X`, `z`/`Z`.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Logic::Zero),
            '1' => Some(Logic::One),
            'x' | 'X' => Some(Logic::X),
            'z' | 'Z' => Some(Logic::Z),
            _ => None,
        }
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        if value {
            Logic::One
        } else {
            Logic::Zero
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'X',
            Logic::Z => 'Z',
        };
        write!(f, "{c}")
    }
}

/// AND: a definite 0 on either side dominates, otherwise unknowns poison.
impl BitAnd for Logic {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Zero, _) | (_, Zero) => Zero,
            (One, One) => One,
            _ => X,
        }
    }
}

/// OR: a definite 1 on either side dominates, otherwise unknowns poison.
impl BitOr for Logic {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (One, _) | (_, One) => One,
            (Zero, Zero) => Zero,
            _ => X,
        }
    }
}

/// XOR: defined only when both operands are definite.
impl BitXor for Logic {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        use Logic::*;
        match (self, rhs) {
            (Zero, Zero) | (One, One) => Zero,
            (Zero, One) | (One, Zero) => One,
            _ => X,
        }
    }
}

/// NOT: inverts definite bits; X and Z both invert to X.
impl Not for Logic {
    type Output = Self;

    fn not(self) -> Self {
        use Logic::*;
        match self {
            Zero => One,
            One => Zero,
            X | Z => X,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Logic;
    use super::Logic::*;

    #[test]
    fn and_zero_dominates() {
        for v in [Zero, One, X, Z] {
            assert_eq!(Zero & v, Zero);
            assert_eq!(v & Zero, Zero);
        }
    }

    #[test]
    fn and_unknowns_poison() {
        assert_eq!(One & One, One);
        assert_eq!(One & X, X);
        assert_eq!(One & Z, X);
        assert_eq!(X & Z, X);
        assert_eq!(Z & Z, X);
    }

    #[test]
    fn or_one_dominates() {
        for v in [Zero, One, X, Z] {
            assert_eq!(One | v, One);
            assert_eq!(v | One, One);
        }
    }

    #[test]
    fn or_unknowns_poison() {
        assert_eq!(Zero | Zero, Zero);
        assert_eq!(Zero | X, X);
        assert_eq!(Zero | Z, X);
        assert_eq!(X | X, X);
    }

    #[test]
    fn xor_definite_only() {
        assert_eq!(Zero ^ Zero, Zero);
        assert_eq!(One ^ Zero, One);
        assert_eq!(Zero ^ One, One);
        assert_eq!(One ^ One, Zero);
        assert_eq!(One ^ X, X);
        assert_eq!(Z ^ Zero, X);
    }

    #[test]
    fn not_table() {
        assert_eq!(!Zero, One);
        assert_eq!(!One, Zero);
        assert_eq!(!X, X);
        assert_eq!(!Z, X);
    }

    #[test]
    fn is_known() {
        assert!(Zero.is_known());
        assert!(One.is_known());
        assert!(!X.is_known());
        assert!(!Z.is_known());
    }

    #[test]
    fn from_bool() {
        assert_eq!(Logic::from(true), One);
        assert_eq!(Logic::from(false), Zero);
    }

    #[test]
    fn from_char_roundtrip() {
        for (c, v) in [('0', Zero), ('1', One), ('x', X), ('Z', Z)] {
            assert_eq!(Logic::from_char(c), Some(v));
        }
        assert_eq!(Logic::from_char('q'), None);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{Zero}{One}{X}{Z}"), "01XZ");
    }

    #[test]
    fn serde_roundtrip() {
        let json = serde_json::to_string(&X).unwrap();
        let back: Logic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, X);
    }
}

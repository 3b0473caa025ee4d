//! Foundational types shared by the Silica simulation runtime and by
//! generated module code.
//!
//! This crate provides the four-state scalar logic value, the packed
//! four-state bit vector used for signal storage, and the dense ID-indexed
//! arena backing the runtime's hierarchy and callback tables.

#![warn(missing_docs)]

pub mod arena;
pub mod logic;
pub mod logic_vector;

pub use arena::{Arena, EntityId};
pub use logic::Logic;
pub use logic_vector::LogicVector;

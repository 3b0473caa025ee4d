//! Event-driven, region-based simulation kernel for generated HDL modules.
//!
//! This crate is the runtime that generated module code links against. An
//! elaborated design becomes a tree of types implementing [`ModuleKernel`];
//! the [`Scheduler`] drives the tree through hardware simulation semantics:
//! `init` once, delta cycles of combinational settling / clocked update /
//! non-blocking publication at each simulation time, and `finalize` once at
//! the end.
//!
//! # Execution model
//!
//! Execution is single-threaded and cooperative: the scheduler issues every
//! region call, so module state is never mutated concurrently. Within one
//! delta cycle, combinational settling strictly precedes the clocked
//! update, which strictly precedes non-blocking publication. Signal edges
//! and timed events feed back into evaluation only through the scheduler's
//! callback queue, with a one-pass delay between cause and effect.
//!
//! Failures are never tolerated silently: a combinational cycle, a delta
//! loop that re-triggers the same time without bound, or a malformed
//! hierarchy each abort the run with an error naming the offender.
//!
//! # Modules
//!
//! - `time` — femtosecond simulation time
//! - `error` — the fatal failure taxonomy
//! - `value` — four-state signal values with change/edge tracking
//! - `graph` — combinational fixpoint bookkeeping
//! - `process` — combinational and flip-flop process handles
//! - `hierarchy` — the module instance tree and path computation
//! - `module` — the five-operation lifecycle contract
//! - `scheduler` — the global orchestrator and run loop

#![warn(missing_docs)]

pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod module;
pub mod process;
pub mod scheduler;
pub mod time;
pub mod value;

pub use error::SimError;
pub use graph::CombGraph;
pub use hierarchy::{Hierarchy, ModuleId};
pub use module::ModuleKernel;
pub use process::{CombProcess, FfProcess};
pub use scheduler::{CallbackId, CallbackSink, Finish, RunSummary, Scheduler, SimConfig};
pub use time::SimTime;
pub use value::LogicValue;

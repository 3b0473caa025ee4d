//! The global simulation orchestrator.
//!
//! [`Scheduler`] owns simulation time, the timed-event queue, the callback
//! registry, the module hierarchy, and the per-module combinational graphs.
//! [`Scheduler::run`] drives the whole region sequence: `init` once per
//! module, then delta cycles of combinational settling, clocked update,
//! non-blocking publication, and a re-settle of the nets the published
//! values drive, repeating at the same time while callbacks are eligible
//! and advancing to the next scheduled timestamp otherwise, and `finalize`
//! once per module at the end.
//!
//! Callback enqueue is the only path by which a signal edge or a timed
//! event feeds back into evaluation: [`Scheduler::schedule_callbacks`]
//! appends to a pending set that is promoted to the `triggered` set at the
//! start of the *next* delta cycle, guaranteeing a one-pass delay between
//! cause and effect and ruling out re-entrant callback execution.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use serde::{Deserialize, Serialize};
use silica_common::{Arena, EntityId};

use crate::error::SimError;
use crate::graph::CombGraph;
use crate::hierarchy::{Hierarchy, ModuleId};
use crate::module::ModuleKernel;
use crate::process::{CombProcess, FfProcess};
use crate::time::SimTime;

/// Opaque ID of a registered wake-up callback.
///
/// Edge-callback lists on [`LogicValue`](crate::value::LogicValue) and timed
/// events both refer to callbacks by this ID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct CallbackId(u32);

impl EntityId for CallbackId {
    fn from_index(index: u32) -> Self {
        Self(index)
    }

    fn index(self) -> u32 {
        self.0
    }
}

/// The capability to enqueue wake-up callbacks for a later evaluation pass.
///
/// [`Scheduler`] is the production implementation; tests exercise a value
/// in isolation with a recording sink instead of a full scheduler.
pub trait CallbackSink {
    /// Appends callbacks to the pending set. They become visible to
    /// [`Scheduler::triggered`] in the next delta cycle, never synchronously.
    fn schedule_callbacks(&mut self, callbacks: &[CallbackId]);
}

/// A callback registration record.
#[derive(Debug, Clone, Copy)]
struct CallbackInfo {
    module: ModuleId,
}

/// A callback armed to fire at a future simulation time.
#[derive(Debug, Clone, Copy)]
struct TimedEvent {
    time: SimTime,
    callback: CallbackId,
}

impl PartialEq for TimedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.time == other.time
    }
}

impl Eq for TimedEvent {}

impl PartialOrd for TimedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time.cmp(&other.time)
    }
}

/// Limits and bounds for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Maximum combinational settle passes per delta cycle before the run
    /// aborts with [`SimError::Unstable`].
    pub max_settle_passes: u32,
    /// Maximum delta cycles at one simulation time before the run aborts
    /// with [`SimError::DeltaLimit`].
    pub max_deltas_per_step: u32,
    /// Optional wall-clock stop time; events past it are left unprocessed.
    pub time_limit: Option<SimTime>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_settle_passes: 100,
            max_deltas_per_step: 10_000,
            time_limit: None,
        }
    }
}

/// A latched `$finish` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finish {
    /// The code passed to `finish`.
    pub code: i32,
    /// The simulation time at which `finish` was called.
    pub time: SimTime,
}

/// The outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Simulation time when the run ended.
    pub final_time: SimTime,
    /// The `$finish` request that ended the run, if any.
    pub finish: Option<Finish>,
    /// Total delta cycles executed.
    pub total_deltas: u64,
    /// Output collected through [`Scheduler::display`].
    pub output: Vec<String>,
}

/// The simulation scheduler.
///
/// Construction order mirrors elaboration: register modules (root first),
/// then processes and callbacks, wire edge sensitivity into values, and
/// finally call [`run`](Scheduler::run) with the root module.
#[derive(Debug, Default)]
pub struct Scheduler {
    config: SimConfig,
    time: SimTime,
    hierarchy: Hierarchy,
    /// Combinational graphs, indexed by `ModuleId` slot.
    graphs: Vec<CombGraph>,
    callbacks: Arena<CallbackId, CallbackInfo>,
    event_queue: BinaryHeap<Reverse<TimedEvent>>,
    /// Callbacks that became eligible during the current pass; promoted to
    /// `triggered` when the next delta cycle begins.
    pending: Vec<CallbackId>,
    /// Callbacks armed for the delta cycle currently executing.
    triggered: HashSet<CallbackId>,
    finish: Option<Finish>,
    output: Vec<String>,
    total_deltas: u64,
}

impl Scheduler {
    /// Creates a scheduler with default limits.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Creates a scheduler with explicit limits.
    pub fn with_config(config: SimConfig) -> Self {
        Self {
            config,
            time: SimTime::ZERO,
            hierarchy: Hierarchy::new(),
            graphs: Vec::new(),
            callbacks: Arena::new(),
            event_queue: BinaryHeap::new(),
            pending: Vec::new(),
            triggered: HashSet::new(),
            finish: None,
            output: Vec::new(),
            total_deltas: 0,
        }
    }

    // ---- elaboration ----

    /// Registers a module instance and allocates its combinational graph.
    pub fn register_module(
        &mut self,
        def_name: impl Into<String>,
        inst_name: impl Into<String>,
        parent: Option<ModuleId>,
    ) -> Result<ModuleId, SimError> {
        let id = self.hierarchy.register(def_name, inst_name, parent)?;
        self.graphs.push(CombGraph::new());
        Ok(id)
    }

    /// Registers a combinational process for `module`, returning its handle.
    pub fn register_comb_process(&mut self, module: ModuleId) -> CombProcess {
        let slot = self.graphs[module.index() as usize].add_slot();
        CombProcess::new(module, slot)
    }

    /// Registers a flip-flop process for `module`. Its wake-up callback is
    /// what clock-edge lists and timed events should target.
    pub fn register_ff_process(&mut self, module: ModuleId) -> FfProcess {
        FfProcess::new(self.register_callback(module))
    }

    /// Registers a bare wake-up callback owned by `module`.
    pub fn register_callback(&mut self, module: ModuleId) -> CallbackId {
        self.callbacks.insert(CallbackInfo { module })
    }

    // ---- introspection ----

    /// Returns the module instance tree.
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    /// Returns the dotted hierarchy path of a module.
    pub fn path(&self, id: ModuleId) -> String {
        self.hierarchy.path(id)
    }

    /// Returns the module that registered a callback.
    pub fn callback_owner(&self, id: CallbackId) -> ModuleId {
        self.callbacks[id].module
    }

    /// Returns the current simulation time.
    pub fn now(&self) -> SimTime {
        self.time
    }

    /// Returns `true` when every module's combinational graph settled in
    /// the last pass.
    pub fn stabilized(&self) -> bool {
        self.graphs.iter().all(CombGraph::stabilized)
    }

    /// Returns `true` when `module`'s own combinational graph settled.
    pub fn module_stabilized(&self, module: ModuleId) -> bool {
        self.graphs[module.index() as usize].stabilized()
    }

    /// Total delta cycles executed so far.
    pub fn total_deltas(&self) -> u64 {
        self.total_deltas
    }

    // ---- operations available to generated module code ----

    /// Returns `true` if `callback` is armed in the current delta cycle.
    pub fn triggered(&self, callback: CallbackId) -> bool {
        self.triggered.contains(&callback)
    }

    /// Arms `callback` to fire in the delta cycles at `time`.
    ///
    /// A time at or before the current one fires in the next delta cycle at
    /// the current time; simulation time never moves backwards.
    pub fn schedule_at(&mut self, time: SimTime, callback: CallbackId) {
        self.event_queue.push(Reverse(TimedEvent { time, callback }));
    }

    /// Latches a `$finish` request. The first request wins; no further
    /// delta cycles are scheduled, but finalization still runs.
    pub fn finish(&mut self, code: i32) {
        if self.finish.is_none() {
            self.finish = Some(Finish {
                code,
                time: self.time,
            });
        }
    }

    /// Collects a line of simulation output for the run summary.
    pub fn display(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub(crate) fn graph_mut(&mut self, module: ModuleId) -> &mut CombGraph {
        &mut self.graphs[module.index() as usize]
    }

    // ---- the run loop ----

    /// Runs the simulation to completion.
    ///
    /// `top` is the root of the module tree; its region methods are
    /// responsible for recursing into children (parent processes first),
    /// in the same order for every region. The run ends when no callback
    /// is pending at any time, when the time limit is reached, or when
    /// `finish` was requested. Combinational nets are settled again after
    /// every publication pass, so derived values are never stale when time
    /// advances or the run ends. `finalize` runs exactly once per module in
    /// all of these cases.
    pub fn run(&mut self, top: &mut dyn ModuleKernel) -> Result<RunSummary, SimError> {
        top.init(self)?;

        let mut deltas_at_time: u32 = 0;
        while self.finish.is_none() {
            if deltas_at_time >= self.config.max_deltas_per_step {
                return Err(SimError::DeltaLimit {
                    time: self.time,
                    max: self.config.max_deltas_per_step,
                });
            }

            self.begin_delta();
            self.settle(top)?;
            top.ff(self)?;
            top.nba(self)?;
            // published values drive comb nets; re-settle them before
            // deciding to advance or stop
            self.settle(top)?;
            self.total_deltas += 1;
            deltas_at_time += 1;

            if self.finish.is_some() || !self.pending.is_empty() {
                continue;
            }

            // Nothing re-triggered at the current time: advance.
            let Some(next) = self.next_event_time() else {
                break;
            };
            if let Some(limit) = self.config.time_limit {
                if next > limit {
                    break;
                }
            }
            if next > self.time {
                self.time = next;
                deltas_at_time = 0;
            }
            self.release_due_events();
        }

        if let Some(finish) = self.finish {
            self.output
                .push(format!("$finish({}) called at {}", finish.code, finish.time));
        }

        top.finalize(self)?;

        Ok(RunSummary {
            final_time: self.time,
            finish: self.finish,
            total_deltas: self.total_deltas,
            output: std::mem::take(&mut self.output),
        })
    }

    /// Promotes pending callbacks into the triggered set for the delta
    /// cycle about to execute.
    fn begin_delta(&mut self) {
        self.triggered.clear();
        self.triggered.extend(self.pending.drain(..));
    }

    /// Runs the combinational region across the whole hierarchy until every
    /// module's graph reports stabilized, within the configured pass bound.
    fn settle(&mut self, top: &mut dyn ModuleKernel) -> Result<(), SimError> {
        for _ in 0..self.config.max_settle_passes {
            top.comb(self)?;
            if self.stabilized() {
                return Ok(());
            }
        }
        let path = self
            .graphs
            .iter()
            .position(|g| !g.stabilized())
            .map(|i| self.path(ModuleId::from_index(i as u32)))
            .unwrap_or_default();
        Err(SimError::Unstable {
            path,
            passes: self.config.max_settle_passes,
        })
    }

    /// Earliest queued event time, clamped to never precede the current time.
    fn next_event_time(&self) -> Option<SimTime> {
        self.event_queue
            .peek()
            .map(|Reverse(e)| e.time.max(self.time))
    }

    /// Moves every event due at or before the current time into the pending
    /// set, to be delivered in the next delta cycle.
    fn release_due_events(&mut self) {
        while self
            .event_queue
            .peek()
            .is_some_and(|Reverse(e)| e.time <= self.time)
        {
            if let Some(Reverse(e)) = self.event_queue.pop() {
                self.pending.push(e.callback);
            }
        }
    }
}

impl CallbackSink for Scheduler {
    fn schedule_callbacks(&mut self, callbacks: &[CallbackId]) {
        self.pending.extend_from_slice(callbacks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleKernel;

    /// A leaf module that counts its lifecycle invocations.
    struct Probe {
        id: ModuleId,
        init_calls: u32,
        comb_passes: u32,
        ff_calls: u32,
        nba_calls: u32,
        final_calls: u32,
        comb: CombProcess,
    }

    impl Probe {
        fn new(ctx: &mut Scheduler) -> Self {
            let id = ctx.register_module("probe", "top", None).unwrap();
            let comb = ctx.register_comb_process(id);
            Self {
                id,
                init_calls: 0,
                comb_passes: 0,
                ff_calls: 0,
                nba_calls: 0,
                final_calls: 0,
                comb,
            }
        }
    }

    impl ModuleKernel for Probe {
        fn init(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
            self.init_calls += 1;
            Ok(())
        }

        fn comb(&mut self, ctx: &mut Scheduler) -> Result<(), SimError> {
            self.comb_passes += 1;
            self.comb.record(ctx, false);
            Ok(())
        }

        fn ff(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
            self.ff_calls += 1;
            Ok(())
        }

        fn nba(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
            self.nba_calls += 1;
            Ok(())
        }

        fn finalize(&mut self, _ctx: &mut Scheduler) -> Result<(), SimError> {
            self.final_calls += 1;
            Ok(())
        }
    }

    #[test]
    fn empty_run_executes_one_delta() {
        let mut ctx = Scheduler::new();
        let mut top = Probe::new(&mut ctx);
        let summary = ctx.run(&mut top).unwrap();
        assert_eq!(top.init_calls, 1);
        // one settle pass before the clocked update, one after publication
        assert_eq!(top.comb_passes, 2);
        assert_eq!(top.ff_calls, 1);
        assert_eq!(top.nba_calls, 1);
        assert_eq!(top.final_calls, 1);
        assert_eq!(summary.total_deltas, 1);
        assert_eq!(summary.final_time, SimTime::ZERO);
        assert!(summary.finish.is_none());
    }

    #[test]
    fn timed_event_advances_clock() {
        let mut ctx = Scheduler::new();
        let mut top = Probe::new(&mut ctx);
        let cb = ctx.register_callback(top.id);
        ctx.schedule_at(SimTime::from_ns(5), cb);
        let summary = ctx.run(&mut top).unwrap();
        assert_eq!(summary.final_time, SimTime::from_ns(5));
        // one delta at t=0, one for the released event at 5 ns
        assert_eq!(summary.total_deltas, 2);
    }

    #[test]
    fn time_limit_leaves_future_events_unprocessed() {
        let mut ctx = Scheduler::with_config(SimConfig {
            time_limit: Some(SimTime::from_ns(3)),
            ..SimConfig::default()
        });
        let mut top = Probe::new(&mut ctx);
        let cb = ctx.register_callback(top.id);
        ctx.schedule_at(SimTime::from_ns(10), cb);
        let summary = ctx.run(&mut top).unwrap();
        assert_eq!(summary.final_time, SimTime::ZERO);
        assert_eq!(top.final_calls, 1);
    }

    #[test]
    fn finish_in_init_skips_deltas_but_finalizes() {
        let mut ctx = Scheduler::new();
        let mut top = Probe::new(&mut ctx);
        ctx.finish(2);
        let summary = ctx.run(&mut top).unwrap();
        assert_eq!(summary.total_deltas, 0);
        assert_eq!(top.final_calls, 1);
        assert_eq!(
            summary.finish,
            Some(Finish {
                code: 2,
                time: SimTime::ZERO
            })
        );
        assert_eq!(summary.output, vec!["$finish(2) called at 0 fs"]);
    }

    #[test]
    fn first_finish_wins() {
        let mut ctx = Scheduler::new();
        ctx.finish(1);
        ctx.finish(7);
        assert_eq!(ctx.finish.map(|f| f.code), Some(1));
    }

    #[test]
    fn pending_callbacks_trigger_next_delta_only() {
        let mut ctx = Scheduler::new();
        let m = ctx.register_module("m", "top", None).unwrap();
        let cb = ctx.register_callback(m);
        ctx.schedule_callbacks(&[cb]);
        assert!(!ctx.triggered(cb));
        ctx.begin_delta();
        assert!(ctx.triggered(cb));
        ctx.begin_delta();
        assert!(!ctx.triggered(cb));
    }

    #[test]
    fn callback_owner_is_recorded() {
        let mut ctx = Scheduler::new();
        let m = ctx.register_module("m", "top", None).unwrap();
        let cb = ctx.register_callback(m);
        assert_eq!(ctx.callback_owner(cb), m);
    }

    #[test]
    fn events_release_together_per_timestamp() {
        let mut ctx = Scheduler::new();
        let m = ctx.register_module("m", "top", None).unwrap();
        let a = ctx.register_callback(m);
        let b = ctx.register_callback(m);
        let c = ctx.register_callback(m);
        ctx.schedule_at(SimTime::from_ns(1), a);
        ctx.schedule_at(SimTime::from_ns(1), b);
        ctx.schedule_at(SimTime::from_ns(2), c);
        ctx.time = SimTime::from_ns(1);
        ctx.release_due_events();
        assert_eq!(ctx.pending.len(), 2);
        assert_eq!(ctx.event_queue.len(), 1);
    }

    #[test]
    fn display_collects_into_summary() {
        let mut ctx = Scheduler::new();
        let mut top = Probe::new(&mut ctx);
        ctx.display("hello");
        let summary = ctx.run(&mut top).unwrap();
        assert_eq!(summary.output, vec!["hello".to_string()]);
    }
}

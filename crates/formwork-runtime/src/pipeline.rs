//! Recomputation pipeline state machine
//!
//! The pipeline decides *when* logic runs and *whether* its result may be
//! merged. It holds no timers and spawns nothing; the form actor drives it
//! and owns the actual debounce timer and logic tasks.
//!
//! ```text
//!            change                     timer fires
//!   Idle ───────────► PendingDebounce ─────────────► Running
//!    ▲                 │  ▲    change                  │
//!    │                 └──┘    (restart, gen += 1)     │
//!    └────────────── run completes (merge or discard) ─┘
//! ```
//!
//! A run may still be in flight while a newer change is pending; the
//! reported phase is then `PendingDebounce`. A run started at generation
//! `g` may merge only if the live generation is still `g` when it
//! completes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number of accepted changes
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen:{}", self.0)
    }
}

/// Observable phase of the pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing pending, nothing running
    #[default]
    Idle,
    /// A debounce window is open
    PendingDebounce,
    /// At least one logic run is in flight and no window is open
    Running,
}

/// What to do with a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The run is current: merge its result
    Merge,
    /// A newer change superseded the run: drop its result
    Stale,
}

/// Snapshot of pipeline progress, published to observers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormStatus {
    /// Live generation (number of accepted changes)
    pub generation: Generation,
    pub phase: Phase,
    /// Generation of the last merged run
    pub merged: Option<Generation>,
    /// Logic runs started
    pub runs_started: u64,
    /// Runs whose results were merged
    pub runs_merged: u64,
    /// Runs discarded as stale
    pub runs_discarded: u64,
    /// Runs that failed or panicked
    pub runs_failed: u64,
}

/// Debounce/generation bookkeeping for one form
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    generation: Generation,
    pending: bool,
    in_flight: usize,
    status: FormStatus,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live generation
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// True while a debounce window is open
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Number of logic runs in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn phase(&self) -> Phase {
        if self.pending {
            Phase::PendingDebounce
        } else if self.in_flight > 0 {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// Record an accepted change: bump the generation and (re)open the
    /// debounce window
    ///
    /// The caller restarts its timer.
    pub fn accept_change(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.pending = true;
        self.generation
    }

    /// The debounce window elapsed: start a run for the live generation
    ///
    /// Returns `None` if no window was open.
    pub fn start_run(&mut self) -> Option<Generation> {
        if !self.pending {
            return None;
        }
        self.pending = false;
        self.in_flight += 1;
        self.status.runs_started += 1;
        Some(self.generation)
    }

    /// A run started at `started` finished successfully
    pub fn complete(&mut self, started: Generation) -> Completion {
        self.in_flight = self.in_flight.saturating_sub(1);
        if started == self.generation {
            self.status.runs_merged += 1;
            self.status.merged = Some(started);
            Completion::Merge
        } else {
            self.status.runs_discarded += 1;
            Completion::Stale
        }
    }

    /// A run failed; its result (if any) is dropped
    pub fn fail(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.status.runs_failed += 1;
    }

    /// Current status snapshot
    pub fn status(&self) -> FormStatus {
        FormStatus {
            generation: self.generation,
            phase: self.phase(),
            ..self.status
        }
    }
}

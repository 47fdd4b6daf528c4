//! Per-node task supervisor.
//!
//! Every node owns one [`Scheduler`] holding its named timers: debounce
//! deadlines, blink loops, the entry sequence, the measurement loop and the
//! safety session. Tasks are keyed by a small per-node enum and the table
//! enforces **at most one live instance per name**: arming a name that is
//! already live replaces it, so a rapid double trigger can never leave two
//! blink loops running.
//!
//! ```text
//!   handler ──arm/cancel──▶ ┌───────────────────────────┐
//!                           │ Scheduler<K>              │
//!                           │  key │ deadline │ period  │
//!   run loop ◀──pop_due──── │  ... │   ...    │  ...    │
//!                           └───────────────────────────┘
//! ```
//!
//! The scheduler never calls back into its owner. The node's run loop asks
//! for the next due key with [`Scheduler::pop_due`] and dispatches it, so a
//! cancellation issued by one handler takes effect before the next task is
//! popped, never in the middle of another handler.

use core::fmt::Debug;

use log::{debug, warn};

/// Virtual or monotonic time in milliseconds.
pub type Millis = u64;

/// Maximum number of concurrently live tasks per node (stack-allocated).
const MAX_TASKS: usize = 8;

/// How a task behaves after it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Fire once, then disappear.
    OneShot,
    /// Fire every `period` ms until cancelled.
    Periodic { period: Millis },
}

/// Internal bookkeeping for a live task.
#[derive(Debug, Clone, Copy)]
struct TaskEntry<K> {
    key: K,
    kind: TaskKind,
    deadline: Millis,
    /// Arming order, used to break deadline ties.
    seq: u64,
}

/// Fixed-capacity table of named, cancellable timers.
pub struct Scheduler<K> {
    tasks: heapless::Vec<TaskEntry<K>, MAX_TASKS>,
    next_seq: u64,
}

impl<K: Copy + PartialEq + Debug> Default for Scheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + PartialEq + Debug> Scheduler<K> {
    pub fn new() -> Self {
        Self {
            tasks: heapless::Vec::new(),
            next_seq: 0,
        }
    }

    /// Arm `key` to fire once at `deadline`, replacing any live instance.
    pub fn arm_once(&mut self, key: K, deadline: Millis) -> bool {
        self.arm(key, TaskKind::OneShot, deadline)
    }

    /// Arm `key` to fire at `first` and then every `period` ms, replacing
    /// any live instance.
    pub fn arm_periodic(&mut self, key: K, first: Millis, period: Millis) -> bool {
        self.arm(key, TaskKind::Periodic { period }, first)
    }

    /// Cancel `key`.  Returns `true` if it was live.
    pub fn cancel(&mut self, key: K) -> bool {
        match self.tasks.iter().position(|t| t.key == key) {
            Some(idx) => {
                let _ = self.tasks.swap_remove(idx);
                debug!("Scheduler: cancelled {:?}", key);
                true
            }
            None => false,
        }
    }

    /// Whether `key` is currently armed.
    pub fn is_live(&self, key: K) -> bool {
        self.tasks.iter().any(|t| t.key == key)
    }

    /// Deadline of `key`, if armed.
    pub fn deadline_of(&self, key: K) -> Option<Millis> {
        self.tasks.iter().find(|t| t.key == key).map(|t| t.deadline)
    }

    /// Earliest deadline across all live tasks.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.tasks.iter().map(|t| t.deadline).min()
    }

    /// Number of live tasks.
    pub fn live_count(&self) -> usize {
        self.tasks.len()
    }

    /// Pop the earliest task due at `now`.
    ///
    /// Ties on the deadline resolve in arming order.  One-shot tasks are
    /// removed; periodic tasks are re-armed at `deadline + period`.
    pub fn pop_due(&mut self, now: Millis) -> Option<K> {
        let idx = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline <= now)
            .min_by_key(|(_, t)| (t.deadline, t.seq))
            .map(|(i, _)| i)?;

        let entry = self.tasks[idx];
        match entry.kind {
            TaskKind::OneShot => {
                let _ = self.tasks.swap_remove(idx);
            }
            TaskKind::Periodic { period } => {
                let seq = self.bump_seq();
                let task = &mut self.tasks[idx];
                task.deadline = entry.deadline + period;
                task.seq = seq;
            }
        }
        Some(entry.key)
    }

    /// Drop every task.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    // ── Internal ──────────────────────────────────────────────────

    fn arm(&mut self, key: K, kind: TaskKind, deadline: Millis) -> bool {
        let seq = self.bump_seq();
        let entry = TaskEntry {
            key,
            kind,
            deadline,
            seq,
        };

        if let Some(slot) = self.tasks.iter_mut().find(|t| t.key == key) {
            debug!("Scheduler: re-armed {:?} for t={}ms", key, deadline);
            *slot = entry;
            return true;
        }

        match self.tasks.push(entry) {
            Ok(()) => {
                debug!("Scheduler: armed {:?} for t={}ms", key, deadline);
                true
            }
            Err(_) => {
                warn!("Scheduler: table full, {:?} not armed", key);
                false
            }
        }
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

//! Press-count debouncer for the single user button on interactive nodes.
//!
//! ## Behaviour
//!
//! Every press increments a counter and pushes a single-shot deadline to
//! `now + window`.  When the deadline passes without another press the
//! accumulated count is the resolved command and the debouncer returns to
//! idle; the next press starts a brand-new session.
//!
//! ```text
//!  press   press      press               (window elapses)
//!    │       │          │                        │
//!    ▼       ▼          ▼                        ▼
//!  Idle ─▶ Counting(1) ─▶ Counting(2) ─▶ Counting(3) ─▶ resolved 3 ─▶ Idle
//! ```
//!
//! The debouncer only computes deadlines; the owning node arms its
//! scheduler with the value returned from [`Debouncer::on_press`] and calls
//! [`Debouncer::expire`] when that task fires.

use crate::scheduler::Millis;

/// Internal state of the counting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DebounceState {
    Idle,
    Counting { presses: u8, deadline: Millis },
}

pub struct Debouncer {
    window_ms: Millis,
    state: DebounceState,
}

impl Debouncer {
    pub fn new(window_ms: Millis) -> Self {
        Self {
            window_ms,
            state: DebounceState::Idle,
        }
    }

    /// Inactivity window in milliseconds.
    pub fn window_ms(&self) -> Millis {
        self.window_ms
    }

    /// Record a press at `now`.  Returns the (re-armed) deadline.
    pub fn on_press(&mut self, now: Millis) -> Millis {
        let deadline = now + self.window_ms;
        let presses = match self.state {
            DebounceState::Idle => 1,
            DebounceState::Counting { presses, .. } => presses.saturating_add(1),
        };
        self.state = DebounceState::Counting { presses, deadline };
        deadline
    }

    /// Resolve the session if its deadline has passed.
    ///
    /// Returns `None` while idle or when called early (a stale timer that
    /// was superseded by a later press).
    pub fn expire(&mut self, now: Millis) -> Option<u8> {
        match self.state {
            DebounceState::Counting { presses, deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                Some(presses)
            }
            _ => None,
        }
    }

    /// Abandon the current session without resolving it.
    pub fn reset(&mut self) {
        self.state = DebounceState::Idle;
    }

    /// Whether presses are currently being accumulated.
    pub fn is_counting(&self) -> bool {
        matches!(self.state, DebounceState::Counting { .. })
    }

    /// Pending deadline, if counting.
    pub fn deadline(&self) -> Option<Millis> {
        match self.state {
            DebounceState::Counting { deadline, .. } => Some(deadline),
            DebounceState::Idle => None,
        }
    }
}

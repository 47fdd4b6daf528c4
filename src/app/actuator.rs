//! Sub-machines shared by the door and gate nodes.
//!
//! ```text
//!            ToggleAlarm                     ToggleAlarm
//!   Idle ───────────────────▶ AlarmBlink ───────────────────▶ Idle
//!     │   snapshot, blank,     (toggle all     cancel, restore
//!     │   arm 1 s periodic      every 1 s)     snapshot once
//!     │
//!     │ OpenEntry (alarm inactive)
//!     ▼
//!   Delayed ──EntryDelay──▶ Blinking ──EntryEnd──▶ Idle
//!   (door only)             (toggle entry LED      restore entry LED
//!                            every 1 s)
//! ```
//!
//! The two sub-machines never run together on one node: an alarm that
//! starts while an entry sequence is live aborts the sequence first, and
//! OpenEntry is ignored while the alarm is active.

use log::{debug, info};

use crate::config::SystemConfig;
use crate::drivers::indicators::{Indicator, IndicatorSet};
use crate::scheduler::{Millis, Scheduler};

use super::events::{AppEvent, EntryPhase};
use super::ports::{EventSink, IndicatorPort};

/// The indicator the entry sequence blinks.
pub const ENTRY_INDICATOR: Indicator = Indicator::Blue;

/// Named timers of an actuator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorTimer {
    AlarmBlink,
    EntryDelay,
    EntryBlink,
    EntryEnd,
    /// Door node temperature sampling.
    Sampling,
}

// ───────────────────────────────────────────────────────────────
// AlarmBlink
// ───────────────────────────────────────────────────────────────

pub struct AlarmBlink {
    interval_ms: Millis,
    /// Configuration captured at activation; `Some` while the alarm is on.
    saved: Option<IndicatorSet>,
}

impl AlarmBlink {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            interval_ms: config.alarm_blink_interval_ms,
            saved: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.saved.is_some()
    }

    /// Flip the alarm.
    pub fn toggle(
        &mut self,
        now: Millis,
        timers: &mut Scheduler<ActuatorTimer>,
        io: &mut (impl IndicatorPort + EventSink),
    ) {
        match self.saved.take() {
            Some(saved) => {
                timers.cancel(ActuatorTimer::AlarmBlink);
                io.set_indicators(saved);
                info!("Alarm off, indicators restored to {}", saved);
            }
            None => {
                let snapshot = io.indicators();
                self.saved = Some(snapshot);
                io.set_indicators(IndicatorSet::OFF);
                timers.arm_periodic(ActuatorTimer::AlarmBlink, now + self.interval_ms, self.interval_ms);
                info!("Alarm on, saved {}", snapshot);
            }
        }
        io.emit(&AppEvent::AlarmChanged {
            active: self.is_active(),
        });
    }

    /// One blink tick.
    pub fn on_tick(&self, io: &mut impl IndicatorPort) {
        io.toggle_all();
    }

    /// Apply `f` to the configuration that will be restored when the alarm
    /// ends.  No-op while the alarm is off.
    pub fn patch_saved(&mut self, f: impl FnOnce(IndicatorSet) -> IndicatorSet) {
        if let Some(saved) = self.saved.as_mut() {
            *saved = f(*saved);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// EntrySequence
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    Idle,
    Delayed,
    Blinking { saved: IndicatorSet },
}

/// Timed entry blink.  The window is measured from OpenEntry receipt; a
/// node with a non-zero delay blinks only during the tail of the window.
pub struct EntrySequence {
    delay_ms: Millis,
    window_ms: Millis,
    interval_ms: Millis,
    state: EntryState,
}

impl EntrySequence {
    pub fn new(config: &SystemConfig, delay_ms: Millis) -> Self {
        Self {
            delay_ms,
            window_ms: config.entry_sequence_ms,
            interval_ms: config.entry_blink_interval_ms,
            state: EntryState::Idle,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state != EntryState::Idle
    }

    pub fn is_blinking(&self) -> bool {
        matches!(self.state, EntryState::Blinking { .. })
    }

    /// OpenEntry received.  The caller has already checked the alarm.
    pub fn start(
        &mut self,
        now: Millis,
        timers: &mut Scheduler<ActuatorTimer>,
        io: &mut (impl IndicatorPort + EventSink),
    ) -> bool {
        if self.is_live() {
            debug!("Entry sequence already live, OpenEntry ignored");
            return false;
        }
        // Armed before the blink loop so the end wins a same-instant tie.
        timers.arm_once(ActuatorTimer::EntryEnd, now + self.window_ms);
        if self.delay_ms == 0 {
            self.begin_blinking(now, timers, io);
        } else {
            self.state = EntryState::Delayed;
            timers.arm_once(ActuatorTimer::EntryDelay, now + self.delay_ms);
            io.emit(&AppEvent::Entry(EntryPhase::Armed));
            info!("Entry sequence armed, blinking in {} ms", self.delay_ms);
        }
        true
    }

    /// Dispatch one of the sequence's own timers.
    pub fn on_timer(
        &mut self,
        timer: ActuatorTimer,
        now: Millis,
        timers: &mut Scheduler<ActuatorTimer>,
        io: &mut (impl IndicatorPort + EventSink),
    ) {
        match timer {
            ActuatorTimer::EntryDelay if self.state == EntryState::Delayed => {
                self.begin_blinking(now, timers, io);
            }
            ActuatorTimer::EntryBlink if self.is_blinking() => io.toggle(ENTRY_INDICATOR),
            ActuatorTimer::EntryEnd => {
                self.finish(timers, io);
                io.emit(&AppEvent::Entry(EntryPhase::Finished));
                info!("Entry sequence finished");
            }
            other => debug!("Entry sequence: stale {:?}", other),
        }
    }

    /// Tear the sequence down early.
    pub fn abort(&mut self, timers: &mut Scheduler<ActuatorTimer>, io: &mut (impl IndicatorPort + EventSink)) {
        if !self.is_live() {
            return;
        }
        self.finish(timers, io);
        io.emit(&AppEvent::Entry(EntryPhase::Aborted));
        info!("Entry sequence aborted");
    }

    // ── Internal ──────────────────────────────────────────────────

    fn begin_blinking(
        &mut self,
        now: Millis,
        timers: &mut Scheduler<ActuatorTimer>,
        io: &mut (impl IndicatorPort + EventSink),
    ) {
        self.state = EntryState::Blinking {
            saved: io.indicators(),
        };
        io.toggle(ENTRY_INDICATOR);
        timers.arm_periodic(ActuatorTimer::EntryBlink, now + self.interval_ms, self.interval_ms);
        io.emit(&AppEvent::Entry(EntryPhase::Blinking));
        info!("Entry sequence blinking");
    }

    /// Cancel every entry timer and put the entry indicator back.  Only the
    /// entry indicator is restored, so lock or garden-light changes made
    /// during the sequence survive it.
    fn finish(&mut self, timers: &mut Scheduler<ActuatorTimer>, io: &mut impl IndicatorPort) {
        timers.cancel(ActuatorTimer::EntryDelay);
        timers.cancel(ActuatorTimer::EntryBlink);
        timers.cancel(ActuatorTimer::EntryEnd);
        if let EntryState::Blinking { saved } = self.state {
            io.set(ENTRY_INDICATOR, saved.is_on(ENTRY_INDICATOR));
        }
        self.state = EntryState::Idle;
    }
}

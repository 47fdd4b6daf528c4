//! Steam-room violation monitor.
//!
//! The sauna node feeds every measurement tick into the monitor.  Two
//! counters track how many **consecutive** ticks exceeded the active
//! mode's temperature and humidity limits:
//!
//! 1. A violating tick increments its counter.
//! 2. A non-violating tick resets its counter to zero.
//! 3. When either counter reaches the configured limit the monitor
//!    reports a breach and the node runs its shutdown sequence.
//!
//! Counters are scoped to the active mode: selecting a different mode
//! starts both from zero.

use core::fmt;

use log::{error, info, warn};

use crate::app::commands::Mode;
use crate::config::{SystemConfig, Thresholds};

/// Which limit tripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    Temperature,
    Humidity,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature too high"),
            Self::Humidity => write!(f, "humidity too high"),
        }
    }
}

/// Consecutive-violation counters for the active steam-room mode.
pub struct ViolationMonitor {
    sauna: Thresholds,
    steam_bath: Thresholds,
    limit: u8,
    mode: Option<Mode>,
    temperature_count: u8,
    humidity_count: u8,
}

impl ViolationMonitor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            sauna: config.sauna,
            steam_bath: config.steam_bath,
            limit: config.violation_limit,
            mode: None,
            temperature_count: 0,
            humidity_count: 0,
        }
    }

    /// Switch the monitored mode.  A different mode resets both counters.
    pub fn set_mode(&mut self, mode: Option<Mode>) {
        if self.mode != mode {
            self.temperature_count = 0;
            self.humidity_count = 0;
        }
        self.mode = mode;
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Current `(temperature, humidity)` counters.
    pub fn counts(&self) -> (u8, u8) {
        (self.temperature_count, self.humidity_count)
    }

    /// Limits for the active mode.
    pub fn thresholds(&self) -> Option<Thresholds> {
        self.mode.map(|m| match m {
            Mode::Sauna => self.sauna,
            Mode::SteamBath => self.steam_bath,
        })
    }

    /// Evaluate one measurement tick.  Returns the breach, if any.
    ///
    /// With no active mode the tick is ignored.
    pub fn evaluate(&mut self, temperature_c: i16, humidity_percent: i16) -> Option<Violation> {
        let limits = self.thresholds()?;

        Self::count(
            &mut self.temperature_count,
            temperature_c > limits.temperature_c,
            Violation::Temperature,
        );
        Self::count(
            &mut self.humidity_count,
            humidity_percent > limits.humidity_percent,
            Violation::Humidity,
        );

        if self.temperature_count >= self.limit {
            error!("SAFETY LIMIT: {} for {} ticks", Violation::Temperature, self.limit);
            return Some(Violation::Temperature);
        }
        if self.humidity_count >= self.limit {
            error!("SAFETY LIMIT: {} for {} ticks", Violation::Humidity, self.limit);
            return Some(Violation::Humidity);
        }
        None
    }

    /// Clear both counters and the mode.
    pub fn reset(&mut self) {
        self.mode = None;
        self.temperature_count = 0;
        self.humidity_count = 0;
    }

    // ── Internal ──────────────────────────────────────────────────

    fn count(counter: &mut u8, violating: bool, kind: Violation) {
        if violating {
            *counter = counter.saturating_add(1);
            warn!("{} ({} consecutive)", kind, counter);
        } else {
            if *counter != 0 {
                info!("{} cleared", kind);
            }
            *counter = 0;
        }
    }
}

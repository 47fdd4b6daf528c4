//! Port traits, the hexagonal boundary between node logic and hardware.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ node state machine (domain)
//! ```
//!
//! Indicator, sensor and event-sink adapters implement these traits; the
//! radio side is the [`LinkLayer`] port.  Nodes take a single `&mut impl
//! NodePorts` per call so one adapter bundle can satisfy every port without
//! a double mutable borrow.

use crate::drivers::indicators::{Indicator, IndicatorSet};
use crate::radio::LinkLayer;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// The node's fixed set of indicators.
pub trait IndicatorPort {
    /// Current configuration of every indicator.
    fn indicators(&self) -> IndicatorSet;

    /// Drive every indicator to `set`.
    fn set_indicators(&mut self, set: IndicatorSet);

    fn set(&mut self, indicator: Indicator, on: bool) {
        let next = self.indicators().with(indicator, on);
        self.set_indicators(next);
    }

    fn toggle(&mut self, indicator: Indicator) {
        let next = self.indicators().toggled(indicator);
        self.set_indicators(next);
    }

    fn toggle_all(&mut self) {
        let next = self.indicators().inverted();
        self.set_indicators(next);
    }
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Calibrated readings.  Conversion from raw ADC values happens behind
/// this trait.
pub trait SensorPort {
    /// Temperature in °C.
    fn temperature(&mut self) -> i16;

    /// Relative humidity in %.
    fn humidity(&mut self) -> i16;

    /// Light level in lux.
    fn light(&mut self) -> i16;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / console)
// ───────────────────────────────────────────────────────────────

/// Nodes emit structured [`AppEvent`]s through this port.  Adapters
/// decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Bundle
// ───────────────────────────────────────────────────────────────

/// Everything a node touches.
pub trait NodePorts: IndicatorPort + SensorPort + LinkLayer + EventSink {}

impl<T: IndicatorPort + SensorPort + LinkLayer + EventSink> NodePorts for T {}

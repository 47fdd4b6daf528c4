//! System configuration parameters
//!
//! All tunable parameters for the smart-home network: debounce windows,
//! blink timing, sampling periods, the sauna safety session and its
//! threshold pairs, and the reliable-channel retry bound.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Coordinator debounce window (ms).
pub const COORDINATOR_DEBOUNCE_MS: u64 = 4_000;
/// Sauna node debounce window (ms).
pub const SAUNA_DEBOUNCE_MS: u64 = 3_000;
/// Maximum duration of one sauna / steam-bath session (ms).
pub const SAFETY_SESSION_MS: u64 = 60_000;
/// Retransmission bound handed to the reliable unicast primitive.
pub const MAX_RETRANSMISSIONS: u8 = 5;

/// Upper limits for one sauna mode. A reading strictly above a limit is a
/// violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Maximum temperature (°C).
    pub temperature_c: i16,
    /// Maximum relative humidity (%).
    pub humidity_percent: i16,
}

/// What the sauna node does with a press count that is neither 1 nor 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidSelectionPolicy {
    /// Drop the count quietly and keep waiting.
    SilentReset,
    /// Emit a rejection notice, then keep waiting.
    Reject,
}

/// Core system configuration.  Missing fields take their defaults when
/// deserialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Input ---
    /// Coordinator inactivity window before a press count resolves (ms)
    pub coordinator_debounce_ms: u64,
    /// Sauna node inactivity window before a press count resolves (ms)
    pub sauna_debounce_ms: u64,

    // --- Actuator nodes ---
    /// Alarm blink toggle interval (ms); the full period is twice this
    pub alarm_blink_interval_ms: u64,
    /// Entry sequence toggle interval (ms)
    pub entry_blink_interval_ms: u64,
    /// Length of the entry sequence measured from OpenEntry receipt (ms)
    pub entry_sequence_ms: u64,
    /// Door node delay before it joins the entry sequence (ms)
    pub door_entry_delay_ms: u64,
    /// Door node temperature sampling interval (ms)
    pub temperature_sample_interval_ms: u64,

    // --- Sauna / steam bath ---
    /// Measurement loop interval (ms)
    pub measurement_interval_ms: u64,
    /// Safety session duration (ms)
    pub safety_session_ms: u64,
    /// Consecutive violations that trigger a shutdown
    pub violation_limit: u8,
    /// Sauna threshold pair
    pub sauna: Thresholds,
    /// Steam-bath threshold pair
    pub steam_bath: Thresholds,
    /// Handling of a press count outside {1, 2}
    pub invalid_selection: InvalidSelectionPolicy,

    // --- Radio ---
    /// Retransmissions allowed per reliable send
    pub max_retransmissions: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Input
            coordinator_debounce_ms: COORDINATOR_DEBOUNCE_MS,
            sauna_debounce_ms: SAUNA_DEBOUNCE_MS,

            // Actuator nodes
            alarm_blink_interval_ms: 1_000, // 2 s period
            entry_blink_interval_ms: 1_000, // 2 s period
            entry_sequence_ms: 16_000,
            door_entry_delay_ms: 14_000,
            temperature_sample_interval_ms: 10_000,

            // Sauna / steam bath
            measurement_interval_ms: 5_000,
            safety_session_ms: SAFETY_SESSION_MS,
            violation_limit: 3,
            sauna: Thresholds {
                temperature_c: 80,
                humidity_percent: 40,
            },
            steam_bath: Thresholds {
                temperature_c: 50,
                humidity_percent: 90,
            },
            invalid_selection: InvalidSelectionPolicy::Reject,

            // Radio
            max_retransmissions: MAX_RETRANSMISSIONS,
        }
    }
}

impl SystemConfig {
    /// Reject values the node state machines cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let intervals = [
            self.coordinator_debounce_ms,
            self.sauna_debounce_ms,
            self.alarm_blink_interval_ms,
            self.entry_blink_interval_ms,
            self.temperature_sample_interval_ms,
            self.measurement_interval_ms,
            self.safety_session_ms,
        ];
        if intervals.contains(&0) {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        if self.door_entry_delay_ms >= self.entry_sequence_ms {
            return Err(ConfigError::ValidationFailed(
                "door entry delay must end inside the entry sequence",
            ));
        }
        if self.violation_limit == 0 {
            return Err(ConfigError::ValidationFailed("violation limit must be at least 1"));
        }
        Ok(())
    }
}

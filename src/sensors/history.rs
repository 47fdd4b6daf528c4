//! Temperature history kept by the door node.
//!
//! A fixed five-slot ring buffer.  Slots start out holding the
//! [`NO_MEASUREMENT`] sentinel and are overwritten oldest-first as the
//! periodic sampler pushes new readings.  The average skips sentinel
//! slots, and an all-empty buffer reports the sentinel itself.

/// Sentinel for "no reading available yet".
pub const NO_MEASUREMENT: i16 = -100;

const HISTORY_CAP: usize = 5;

pub struct TemperatureHistory {
    ring: [i16; HISTORY_CAP],
    head: usize,
}

impl Default for TemperatureHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureHistory {
    pub fn new() -> Self {
        Self {
            ring: [NO_MEASUREMENT; HISTORY_CAP],
            head: 0,
        }
    }

    /// Store a reading, overwriting the oldest slot once full.
    pub fn push(&mut self, celsius: i16) {
        self.ring[self.head] = celsius;
        self.head = (self.head + 1) % HISTORY_CAP;
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.ring.iter().filter(|&&v| v != NO_MEASUREMENT).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer mean of the populated slots, or [`NO_MEASUREMENT`].
    pub fn average(&self) -> i16 {
        let (sum, count) = self
            .ring
            .iter()
            .filter(|&&v| v != NO_MEASUREMENT)
            .fold((0i32, 0i32), |(s, n), &v| (s + i32::from(v), n + 1));
        if count == 0 {
            return NO_MEASUREMENT;
        }
        (sum / count) as i16
    }
}

//! Sensor-side data handling.
//!
//! Raw readings arrive through [`SensorPort`](crate::app::ports::SensorPort)
//! already calibrated; this module only keeps what the nodes remember
//! between readings.

pub mod history;

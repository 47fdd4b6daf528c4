//! Simulated node hardware.
//!
//! [`SimPorts`] implements every node port in memory: indicators with a
//! timestamped history, scripted sensors, an outbox the medium drains, and
//! a recording event sink that also forwards to [`LogEventSink`].

use std::collections::VecDeque;

use crate::adapters::log_sink::LogEventSink;
use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, IndicatorPort, SensorPort};
use crate::drivers::indicators::{Indicator, IndicatorSet};
use crate::radio::{Frame, LinkLayer, NodeAddress, Port};
use crate::scheduler::Millis;

/// A frame handed to the link layer, waiting for the medium.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transmission {
    Broadcast {
        port: Port,
        frame: Frame,
    },
    Unicast {
        port: Port,
        to: NodeAddress,
        frame: Frame,
        max_retransmissions: u8,
    },
}

/// Sensor that replays scripted values, then repeats a fallback.
#[derive(Debug, Clone)]
pub struct ScriptedSensor {
    script: VecDeque<i16>,
    fallback: i16,
}

impl ScriptedSensor {
    pub fn constant(value: i16) -> Self {
        Self {
            script: VecDeque::new(),
            fallback: value,
        }
    }

    pub fn push(&mut self, values: &[i16]) {
        self.script.extend(values.iter().copied());
    }

    pub fn set_fallback(&mut self, value: i16) {
        self.fallback = value;
    }

    pub fn read(&mut self) -> i16 {
        self.script.pop_front().unwrap_or(self.fallback)
    }
}

pub struct SimPorts {
    address: NodeAddress,
    now: Millis,
    indicators: IndicatorSet,
    indicator_log: Vec<(Millis, IndicatorSet)>,
    pub temperature: ScriptedSensor,
    pub humidity: ScriptedSensor,
    pub light: ScriptedSensor,
    outbox: Vec<Transmission>,
    transmitted: usize,
    events: Vec<(Millis, AppEvent)>,
    sink: LogEventSink,
}

impl SimPorts {
    pub fn new(address: NodeAddress) -> Self {
        Self {
            address,
            now: 0,
            indicators: IndicatorSet::OFF,
            indicator_log: Vec::new(),
            temperature: ScriptedSensor::constant(20),
            humidity: ScriptedSensor::constant(30),
            light: ScriptedSensor::constant(300),
            outbox: Vec::new(),
            transmitted: 0,
            events: Vec::new(),
            sink: LogEventSink::new(address),
        }
    }

    pub fn address(&self) -> NodeAddress {
        self.address
    }

    /// Advance the clock used to timestamp indicator writes and events.
    pub fn set_now(&mut self, now: Millis) {
        self.now = now;
    }

    /// Every indicator write, in order.
    pub fn indicator_log(&self) -> &[(Millis, IndicatorSet)] {
        &self.indicator_log
    }

    /// Instants at which `indicator` actually changed.
    pub fn changes_of(&self, indicator: Indicator) -> Vec<Millis> {
        let mut last = IndicatorSet::OFF.is_on(indicator);
        let mut at = Vec::new();
        for (t, set) in &self.indicator_log {
            if set.is_on(indicator) != last {
                last = set.is_on(indicator);
                at.push(*t);
            }
        }
        at
    }

    /// Configuration in force at `t` (after every write at `t`).
    pub fn indicators_at(&self, t: Millis) -> IndicatorSet {
        self.indicator_log
            .iter()
            .take_while(|(at, _)| *at <= t)
            .last()
            .map_or(IndicatorSet::OFF, |(_, set)| *set)
    }

    pub fn events(&self) -> &[(Millis, AppEvent)] {
        &self.events
    }

    /// Drain everything sent since the last call.
    pub fn take_outbox(&mut self) -> Vec<Transmission> {
        std::mem::take(&mut self.outbox)
    }

    /// Number of frames this node has handed to the link layer so far,
    /// including those already drained.
    pub fn transmissions(&self) -> usize {
        self.transmitted
    }
}

impl IndicatorPort for SimPorts {
    fn indicators(&self) -> IndicatorSet {
        self.indicators
    }

    fn set_indicators(&mut self, set: IndicatorSet) {
        self.indicators = set;
        self.indicator_log.push((self.now, set));
    }
}

impl SensorPort for SimPorts {
    fn temperature(&mut self) -> i16 {
        self.temperature.read()
    }

    fn humidity(&mut self) -> i16 {
        self.humidity.read()
    }

    fn light(&mut self) -> i16 {
        self.light.read()
    }
}

impl LinkLayer for SimPorts {
    fn broadcast(&mut self, port: Port, frame: &[u8]) {
        if let Ok(frame) = Frame::from_slice(frame) {
            self.transmitted += 1;
            self.outbox.push(Transmission::Broadcast { port, frame });
        }
    }

    fn unicast(&mut self, port: Port, to: NodeAddress, frame: &[u8], max_retransmissions: u8) {
        if let Ok(frame) = Frame::from_slice(frame) {
            self.transmitted += 1;
            self.outbox.push(Transmission::Unicast {
                port,
                to,
                frame,
                max_retransmissions,
            });
        }
    }
}

impl EventSink for SimPorts {
    fn emit(&mut self, event: &AppEvent) {
        self.sink.emit(event);
        self.events.push((self.now, event.clone()));
    }
}

//! Mock port bundle for node tests.
//!
//! Records every indicator write, every frame handed to the link layer
//! (decoded back into a `Message`) and every emitted event, so tests can
//! assert on the full history.

use std::collections::VecDeque;

use smarthome::app::events::AppEvent;
use smarthome::app::ports::{EventSink, IndicatorPort, SensorPort};
use smarthome::drivers::indicators::{Indicator, IndicatorSet};
use smarthome::events::{LinkEvent, NodeEvent};
use smarthome::radio::codec::{decode, encode};
use smarthome::radio::{LinkLayer, Message, NodeAddress, Port, TxStatus};
use smarthome::runtime::Node;
use smarthome::scheduler::Millis;

// ── Link call record ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Broadcast { port: Port, msg: Message },
    Unicast { port: Port, to: NodeAddress, msg: Message, max_retx: u8 },
}

// ── MockPorts ─────────────────────────────────────────────────

pub struct MockPorts {
    pub now: Millis,
    pub indicators: IndicatorSet,
    pub writes: Vec<(Millis, IndicatorSet)>,
    pub temperatures: VecDeque<i16>,
    pub temperature: i16,
    pub humidities: VecDeque<i16>,
    pub humidity: i16,
    pub light: i16,
    pub sent: Vec<Sent>,
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl MockPorts {
    pub fn new() -> Self {
        Self {
            now: 0,
            indicators: IndicatorSet::OFF,
            writes: Vec::new(),
            temperatures: VecDeque::new(),
            temperature: 20,
            humidities: VecDeque::new(),
            humidity: 30,
            light: 250,
            sent: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn is_on(&self, indicator: Indicator) -> bool {
        self.indicators.is_on(indicator)
    }

    /// Instants at which `indicator` changed, starting from all-off.
    pub fn changes_of(&self, indicator: Indicator) -> Vec<Millis> {
        let mut last = false;
        let mut at = Vec::new();
        for (t, set) in &self.writes {
            if set.is_on(indicator) != last {
                last = set.is_on(indicator);
                at.push(*t);
            }
        }
        at
    }

    pub fn has_event(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }

    pub fn menus_rendered(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::MenuRendered(_)))
            .count()
    }

    pub fn last_menu(&self) -> Option<&smarthome::app::menu::Menu> {
        self.events.iter().rev().find_map(|e| match e {
            AppEvent::MenuRendered(m) => Some(m),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.sent.clear();
        self.events.clear();
        self.writes.clear();
    }
}

impl Default for MockPorts {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorPort for MockPorts {
    fn indicators(&self) -> IndicatorSet {
        self.indicators
    }

    fn set_indicators(&mut self, set: IndicatorSet) {
        self.indicators = set;
        self.writes.push((self.now, set));
    }
}

impl SensorPort for MockPorts {
    fn temperature(&mut self) -> i16 {
        self.temperatures.pop_front().unwrap_or(self.temperature)
    }

    fn humidity(&mut self) -> i16 {
        self.humidities.pop_front().unwrap_or(self.humidity)
    }

    fn light(&mut self) -> i16 {
        self.light
    }
}

impl LinkLayer for MockPorts {
    fn broadcast(&mut self, port: Port, frame: &[u8]) {
        let msg = decode(frame).unwrap();
        self.sent.push(Sent::Broadcast { port, msg });
    }

    fn unicast(&mut self, port: Port, to: NodeAddress, frame: &[u8], max_retransmissions: u8) {
        let msg = decode(frame).unwrap();
        self.sent.push(Sent::Unicast {
            port,
            to,
            msg,
            max_retx: max_retransmissions,
        });
    }
}

impl EventSink for MockPorts {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Event builders ────────────────────────────────────────────

#[allow(dead_code)]
pub fn broadcast_rx(port: Port, msg: Message) -> NodeEvent {
    LinkEvent::BroadcastReceived {
        port,
        from: NodeAddress::COORDINATOR,
        frame: encode(&msg).unwrap(),
    }
    .into()
}

#[allow(dead_code)]
pub fn broadcast_done(port: Port) -> NodeEvent {
    LinkEvent::BroadcastSent {
        port,
        status: TxStatus::Ok,
        transmissions: 1,
    }
    .into()
}

#[allow(dead_code)]
pub fn unicast_rx(port: Port, from: NodeAddress, msg: Message) -> NodeEvent {
    LinkEvent::UnicastReceived {
        port,
        from,
        seqno: 0,
        frame: encode(&msg).unwrap(),
    }
    .into()
}

#[allow(dead_code)]
pub fn unicast_done(port: Port, to: NodeAddress, retransmissions: u8) -> NodeEvent {
    LinkEvent::UnicastSent {
        port,
        to,
        retransmissions,
    }
    .into()
}

#[allow(dead_code)]
pub fn unicast_gave_up(port: Port, to: NodeAddress) -> NodeEvent {
    LinkEvent::UnicastTimedOut {
        port,
        to,
        retransmissions: 5,
    }
    .into()
}

// ── Driving a node ────────────────────────────────────────────

/// Deliver `event` at `at`.
#[allow(dead_code)]
pub fn deliver<N: Node>(node: &mut N, io: &mut MockPorts, at: Millis, event: NodeEvent) {
    run_until(node, io, at);
    io.now = at;
    node.handle(event, at, io);
}

/// Fire every timer due up to and including `t`, in deadline order.
#[allow(dead_code)]
pub fn run_until<N: Node>(node: &mut N, io: &mut MockPorts, t: Millis) {
    while let Some(due) = node.next_deadline() {
        if due > t {
            break;
        }
        io.now = due;
        while node.fire_due(due, io) {}
    }
    io.now = io.now.max(t);
}

/// Press the node's button `times` times at `at`.
#[allow(dead_code)]
pub fn press<N: Node>(node: &mut N, io: &mut MockPorts, at: Millis, times: u8) {
    for _ in 0..times {
        deliver(node, io, at, NodeEvent::ButtonPressed);
    }
}

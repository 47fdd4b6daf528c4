//! Gate node (address 2.0), in the garden.
//!
//! - AlarmBlink and the immediate 16 s entry sequence.
//! - LockToggle: locked shows red on / green off, unlocked the reverse.
//!   The transport acknowledgment is the only reply.
//! - QueryLight responder on its reliable channel.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::drivers::indicators::{Indicator, IndicatorSet};
use crate::events::{LinkEvent, NodeEvent};
use crate::radio::address::{BROADCAST_PORT, GATE_PORT};
use crate::radio::{self, Message, NodeAddress, ReliableUnicastChannel};
use crate::runtime::Node;
use crate::scheduler::{Millis, Scheduler};

use super::actuator::{ActuatorTimer, AlarmBlink, EntrySequence};
use super::commands::Command;
use super::events::AppEvent;
use super::ports::{EventSink, IndicatorPort, NodePorts, SensorPort};

pub struct GateNode {
    timers: Scheduler<ActuatorTimer>,
    alarm: AlarmBlink,
    entry: EntrySequence,
    channel: ReliableUnicastChannel,
    locked: bool,
}

impl GateNode {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            timers: Scheduler::new(),
            alarm: AlarmBlink::new(config),
            entry: EntrySequence::new(config, 0),
            channel: ReliableUnicastChannel::new(GATE_PORT, config.max_retransmissions),
            locked: false,
        }
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    pub fn entry_live(&self) -> bool {
        self.entry.is_live()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn toggle_lock<P: NodePorts>(&mut self, io: &mut P) {
        self.locked = !self.locked;
        let locked = self.locked;
        if self.alarm.is_active() {
            // Indicators belong to the blink loop; the pattern lands on restore.
            self.alarm.patch_saved(|saved| lock_pattern(saved, locked));
        } else {
            let next = lock_pattern(io.indicators(), locked);
            io.set_indicators(next);
        }
        info!("Gate {}", if locked { "locked" } else { "unlocked" });
        io.emit(&AppEvent::LockChanged { locked });
    }

    fn on_command<P: NodePorts>(&mut self, cmd: Command, from: NodeAddress, now: Millis, io: &mut P) {
        match cmd {
            Command::ToggleAlarm => {
                if !self.alarm.is_active() {
                    self.entry.abort(&mut self.timers, io);
                }
                self.alarm.toggle(now, &mut self.timers, io);
            }
            Command::OpenEntry => {
                if self.alarm.is_active() || !self.entry.start(now, &mut self.timers, io) {
                    io.emit(&AppEvent::EntryIgnored);
                }
            }
            Command::ToggleLock => self.toggle_lock(io),
            Command::QueryLight => {
                if self.alarm.is_active() {
                    info!("Gate: QueryLight ignored, alarm active");
                    return;
                }
                let lux = io.light();
                info!("Gate: light {}", lux);
                super::send_reliable(&mut self.channel, io, from, Message::Reading(lux));
            }
            other => warn!("Gate: {} is not handled here", other),
        }
    }

    fn on_link<P: NodePorts>(&mut self, ev: LinkEvent, now: Millis, io: &mut P) {
        match ev {
            LinkEvent::BroadcastReceived { port, from, frame } if port == BROADCAST_PORT => {
                info!("broadcast message received from {}", from);
                if let Some(Message::Command(cmd)) = radio::decode_received(port, from, &frame) {
                    self.on_command(cmd, from, now, io);
                }
            }
            LinkEvent::UnicastReceived {
                port,
                from,
                seqno,
                frame,
            } if port == GATE_PORT => {
                info!("runicast message received from {}, seqno {}", from, seqno);
                if let Some(Message::Command(cmd)) = radio::decode_received(port, from, &frame) {
                    self.on_command(cmd, from, now, io);
                }
            }
            LinkEvent::UnicastSent {
                port,
                to,
                retransmissions,
            } if port == GATE_PORT => {
                let _ = self.channel.on_sent(to, retransmissions);
            }
            LinkEvent::UnicastTimedOut {
                port,
                to,
                retransmissions,
            } if port == GATE_PORT => {
                let _ = self.channel.on_timed_out(to, retransmissions);
            }
            other => debug!("Gate: ignoring {:?}", other),
        }
    }
}

impl Node for GateNode {
    fn address(&self) -> NodeAddress {
        NodeAddress::GATE
    }

    fn start<P: NodePorts>(&mut self, _now: Millis, io: &mut P) {
        let next = lock_pattern(io.indicators(), self.locked);
        io.set_indicators(next);
        io.emit(&AppEvent::Started(NodeAddress::GATE));
        info!("Gate node started");
    }

    fn handle<P: NodePorts>(&mut self, event: NodeEvent, now: Millis, io: &mut P) {
        match event {
            NodeEvent::ButtonPressed => debug!("Gate: button has no function"),
            NodeEvent::Link(ev) => self.on_link(ev, now, io),
        }
    }

    fn fire_due<P: NodePorts>(&mut self, now: Millis, io: &mut P) -> bool {
        let Some(timer) = self.timers.pop_due(now) else {
            return false;
        };
        match timer {
            ActuatorTimer::AlarmBlink => self.alarm.on_tick(io),
            ActuatorTimer::Sampling => debug!("Gate: no sampling loop"),
            entry => self.entry.on_timer(entry, now, &mut self.timers, io),
        }
        true
    }

    fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }
}

/// Locked: red on, green off.  Unlocked: green on, red off.
pub fn lock_pattern(set: IndicatorSet, locked: bool) -> IndicatorSet {
    set.with(Indicator::Red, locked).with(Indicator::Green, !locked)
}

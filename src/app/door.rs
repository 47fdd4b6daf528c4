//! Door node (address 1.0), in the entrance hall.
//!
//! - AlarmBlink and the delayed entry sequence (blinks during the last
//!   2 s of the 16 s window).
//! - Free-running temperature sampling into a 5-slot history.
//! - QueryTemperature responder on its reliable channel.
//! - Garden lights on the node's own button: green on / red off when on,
//!   red on / green off when off.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::drivers::indicators::Indicator;
use crate::events::{LinkEvent, NodeEvent};
use crate::radio::address::{BROADCAST_PORT, DOOR_PORT};
use crate::radio::{self, Message, NodeAddress, ReliableUnicastChannel};
use crate::runtime::Node;
use crate::scheduler::{Millis, Scheduler};
use crate::sensors::history::TemperatureHistory;

use super::actuator::{ActuatorTimer, AlarmBlink, EntrySequence};
use super::commands::Command;
use super::events::AppEvent;
use super::ports::{EventSink, IndicatorPort, NodePorts, SensorPort};

pub struct DoorNode {
    timers: Scheduler<ActuatorTimer>,
    alarm: AlarmBlink,
    entry: EntrySequence,
    history: TemperatureHistory,
    channel: ReliableUnicastChannel,
    sample_interval_ms: Millis,
    garden_lights: bool,
}

impl DoorNode {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            timers: Scheduler::new(),
            alarm: AlarmBlink::new(config),
            entry: EntrySequence::new(config, config.door_entry_delay_ms),
            history: TemperatureHistory::new(),
            channel: ReliableUnicastChannel::new(DOOR_PORT, config.max_retransmissions),
            sample_interval_ms: config.temperature_sample_interval_ms,
            garden_lights: false,
        }
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    pub fn entry_live(&self) -> bool {
        self.entry.is_live()
    }

    pub fn garden_lights(&self) -> bool {
        self.garden_lights
    }

    pub fn history(&self) -> &TemperatureHistory {
        &self.history
    }

    // ── Handlers ──────────────────────────────────────────────────

    fn on_button<P: NodePorts>(&mut self, io: &mut P) {
        if self.alarm.is_active() {
            debug!("Door: garden lights locked out by the alarm");
            return;
        }
        self.garden_lights = !self.garden_lights;
        apply_garden_lights(self.garden_lights, io);
        info!("Garden lights {}", if self.garden_lights { "on" } else { "off" });
        io.emit(&AppEvent::GardenLightsChanged {
            on: self.garden_lights,
        });
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
            Command::QueryTemperature => {
                if self.alarm.is_active() {
                    info!("Door: QueryTemperature ignored, alarm active");
                    return;
                }
                let average = self.history.average();
                info!("Door: average temperature {} over {} samples", average, self.history.len());
                super::send_reliable(&mut self.channel, io, from, Message::Reading(average));
            }
            other => warn!("Door: {} is not handled here", other),
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
            } if port == DOOR_PORT => {
                info!("runicast message received from {}, seqno {}", from, seqno);
                if let Some(Message::Command(cmd)) = radio::decode_received(port, from, &frame) {
                    self.on_command(cmd, from, now, io);
                }
            }
            LinkEvent::UnicastSent {
                port,
                to,
                retransmissions,
            } if port == DOOR_PORT => {
                let _ = self.channel.on_sent(to, retransmissions);
            }
            LinkEvent::UnicastTimedOut {
                port,
                to,
                retransmissions,
            } if port == DOOR_PORT => {
                let _ = self.channel.on_timed_out(to, retransmissions);
            }
            other => debug!("Door: ignoring {:?}", other),
        }
    }
}

impl Node for DoorNode {
    fn address(&self) -> NodeAddress {
        NodeAddress::DOOR
    }

    fn start<P: NodePorts>(&mut self, now: Millis, io: &mut P) {
        apply_garden_lights(self.garden_lights, io);
        self.timers.arm_periodic(
            ActuatorTimer::Sampling,
            now + self.sample_interval_ms,
            self.sample_interval_ms,
        );
        io.emit(&AppEvent::Started(NodeAddress::DOOR));
        info!("Door node started");
    }

    fn handle<P: NodePorts>(&mut self, event: NodeEvent, now: Millis, io: &mut P) {
        match event {
            NodeEvent::ButtonPressed => self.on_button(io),
            NodeEvent::Link(ev) => self.on_link(ev, now, io),
        }
    }

    fn fire_due<P: NodePorts>(&mut self, now: Millis, io: &mut P) -> bool {
        let Some(timer) = self.timers.pop_due(now) else {
            return false;
        };
        match timer {
            ActuatorTimer::AlarmBlink => self.alarm.on_tick(io),
            ActuatorTimer::Sampling => {
                let celsius = io.temperature();
                self.history.push(celsius);
                debug!("Door: sampled {} °C", celsius);
            }
            entry => self.entry.on_timer(entry, now, &mut self.timers, io),
        }
        true
    }

    fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }
}

fn apply_garden_lights(on: bool, io: &mut impl IndicatorPort) {
    let set = io.indicators().with(Indicator::Green, on).with(Indicator::Red, !on);
    io.set_indicators(set);
}

//! Sauna / steam-bath node (address 4.0).
//!
//! ```text
//!        ToggleSteamRoom              1 or 2 presses
//!  Off ───────────────────▶ SelectingMode ───────────────▶ Active(mode)
//!   ▲                          │   ▲  other count             │  │
//!   │                          │   └──(reject, stay)          │  │ 1/2 presses:
//!   │        shutdown          │                              │  │ switch mode
//!   └──────────────────────────┴──────────────────────────────┘◀─┘
//!     manual toggle · safety timer · 3 consecutive violations
//! ```
//!
//! Entering `Active` arms the safety session and the 5 s measurement loop;
//! every shutdown path cancels both, clears the mode, switches the mode
//! indicator off and tells the coordinator the session ended.

use log::{debug, info, warn};

use crate::config::{InvalidSelectionPolicy, SystemConfig};
use crate::drivers::debouncer::Debouncer;
use crate::drivers::indicators::Indicator;
use crate::events::{LinkEvent, NodeEvent};
use crate::radio::address::SAUNA_PORT;
use crate::radio::{self, Message, NodeAddress, ReliableUnicastChannel};
use crate::runtime::Node;
use crate::safety::ViolationMonitor;
use crate::scheduler::{Millis, Scheduler};

use super::commands::{Command, Mode};
use super::events::{AppEvent, ShutdownReason};
use super::ports::{EventSink, IndicatorPort, NodePorts, SensorPort};

/// The indicator lit while the steam room is on.
pub const MODE_INDICATOR: Indicator = Indicator::Green;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteamRoomState {
    Off,
    SelectingMode,
    Active(Mode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaunaTimer {
    Debounce,
    Safety,
    Measurement,
}

pub struct SaunaNode {
    timers: Scheduler<SaunaTimer>,
    debouncer: Debouncer,
    monitor: ViolationMonitor,
    channel: ReliableUnicastChannel,
    state: SteamRoomState,
    safety_session_ms: Millis,
    measurement_interval_ms: Millis,
    policy: InvalidSelectionPolicy,
}

impl SaunaNode {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            timers: Scheduler::new(),
            debouncer: Debouncer::new(config.sauna_debounce_ms),
            monitor: ViolationMonitor::new(config),
            channel: ReliableUnicastChannel::new(SAUNA_PORT, config.max_retransmissions),
            state: SteamRoomState::Off,
            safety_session_ms: config.safety_session_ms,
            measurement_interval_ms: config.measurement_interval_ms,
            policy: config.invalid_selection,
        }
    }

    pub fn state(&self) -> SteamRoomState {
        self.state
    }

    pub fn mode(&self) -> Option<Mode> {
        self.monitor.mode()
    }

    /// `(temperature, humidity)` consecutive-violation counters.
    pub fn violation_counts(&self) -> (u8, u8) {
        self.monitor.counts()
    }

    /// Deadline of the safety session, if one is running.
    pub fn safety_deadline(&self) -> Option<Millis> {
        self.timers.deadline_of(SaunaTimer::Safety)
    }

    pub fn measuring(&self) -> bool {
        self.timers.is_live(SaunaTimer::Measurement)
    }

    // ── Handlers ──────────────────────────────────────────────────

    fn on_toggle<P: NodePorts>(&mut self, io: &mut P) {
        if self.state == SteamRoomState::Off {
            self.state = SteamRoomState::SelectingMode;
            io.set(MODE_INDICATOR, true);
            info!("Steam room on: 1 press for sauna, 2 for steam bath");
            io.emit(&AppEvent::SteamRoomSwitchedOn);
        } else {
            self.shutdown(ShutdownReason::Manual, io);
        }
    }

    fn select<P: NodePorts>(&mut self, presses: u8, now: Millis, io: &mut P) {
        let Some(mode) = Mode::from_presses(presses) else {
            match self.policy {
                InvalidSelectionPolicy::Reject => {
                    warn!("Invalid selection: {} presses", presses);
                    io.emit(&AppEvent::SelectionRejected { presses });
                }
                InvalidSelectionPolicy::SilentReset => {
                    debug!("Ignoring selection of {} presses", presses);
                }
            }
            return;
        };

        let starting = !matches!(self.state, SteamRoomState::Active(_));
        self.monitor.set_mode(Some(mode));
        self.state = SteamRoomState::Active(mode);
        if starting {
            self.timers
                .arm_once(SaunaTimer::Safety, now + self.safety_session_ms);
            self.timers.arm_periodic(
                SaunaTimer::Measurement,
                now + self.measurement_interval_ms,
                self.measurement_interval_ms,
            );
        }
        info!("{} mode selected", mode);
        io.emit(&AppEvent::SessionStarted(mode));
        super::send_reliable(&mut self.channel, io, NodeAddress::COORDINATOR, Message::ModeSelected(mode));
    }

    fn measure<P: NodePorts>(&mut self, io: &mut P) {
        let temperature_c = io.temperature();
        let humidity_percent = io.humidity();
        info!("Temperature {} °C, humidity {} %", temperature_c, humidity_percent);
        io.emit(&AppEvent::Measurement {
            temperature_c,
            humidity_percent,
        });
        if let Some(violation) = self.monitor.evaluate(temperature_c, humidity_percent) {
            self.shutdown(ShutdownReason::Breach(violation), io);
        }
    }

    fn shutdown<P: NodePorts>(&mut self, reason: ShutdownReason, io: &mut P) {
        self.timers.cancel(SaunaTimer::Safety);
        self.timers.cancel(SaunaTimer::Measurement);
        self.timers.cancel(SaunaTimer::Debounce);
        self.debouncer.reset();
        self.monitor.reset();
        io.set(MODE_INDICATOR, false);
        self.state = SteamRoomState::Off;

        match reason {
            ShutdownReason::Manual => info!("Steam room switched off"),
            other => warn!("Steam room shut down: {}", other),
        }
        io.emit(&AppEvent::SessionShutdown(reason));
        super::send_reliable(&mut self.channel, io, NodeAddress::COORDINATOR, Message::SessionEnded);
    }

    fn on_link<P: NodePorts>(&mut self, ev: LinkEvent, io: &mut P) {
        match ev {
            LinkEvent::UnicastReceived {
                port,
                from,
                seqno,
                frame,
            } if port == SAUNA_PORT => {
                info!("runicast message received from {}, seqno {}", from, seqno);
                match radio::decode_received(port, from, &frame) {
                    Some(Message::Command(Command::ToggleSteamRoom)) => self.on_toggle(io),
                    Some(other) => warn!("Sauna: unexpected {:?}", other),
                    None => {}
                }
            }
            LinkEvent::UnicastSent {
                port,
                to,
                retransmissions,
            } if port == SAUNA_PORT => {
                let _ = self.channel.on_sent(to, retransmissions);
            }
            LinkEvent::UnicastTimedOut {
                port,
                to,
                retransmissions,
            } if port == SAUNA_PORT => {
                let _ = self.channel.on_timed_out(to, retransmissions);
            }
            other => debug!("Sauna: ignoring {:?}", other),
        }
    }
}

impl Node for SaunaNode {
    fn address(&self) -> NodeAddress {
        NodeAddress::SAUNA
    }

    fn start<P: NodePorts>(&mut self, _now: Millis, io: &mut P) {
        io.set(MODE_INDICATOR, false);
        io.emit(&AppEvent::Started(NodeAddress::SAUNA));
        info!("Sauna node started");
    }

    fn handle<P: NodePorts>(&mut self, event: NodeEvent, now: Millis, io: &mut P) {
        match event {
            NodeEvent::ButtonPressed if self.state == SteamRoomState::Off => {
                debug!("Sauna: steam room is off, press ignored");
            }
            NodeEvent::ButtonPressed => {
                let deadline = self.debouncer.on_press(now);
                self.timers.arm_once(SaunaTimer::Debounce, deadline);
            }
            NodeEvent::Link(ev) => self.on_link(ev, io),
        }
    }

    fn fire_due<P: NodePorts>(&mut self, now: Millis, io: &mut P) -> bool {
        let Some(timer) = self.timers.pop_due(now) else {
            return false;
        };
        match timer {
            SaunaTimer::Debounce => {
                if let Some(presses) = self.debouncer.expire(now) {
                    self.select(presses, now, io);
                }
            }
            SaunaTimer::Safety => self.shutdown(ShutdownReason::SafetyTimeout, io),
            SaunaTimer::Measurement => self.measure(io),
        }
        true
    }

    fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }
}

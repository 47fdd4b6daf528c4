//! Central coordinator (address 3.0), the node the user talks to.
//!
//! ```text
//!                 press                    deadline
//!  AwaitingInput ───────▶ Counting ─────────────────────┐
//!        ▲                                              ▼
//!        │          reject (unknown / alarm)      resolve(count)
//!        ├──────────────────────────────────────────────┤
//!        │                                              ▼ send
//!        │      local send complete            ┌─ Dispatching (broadcast)
//!        ├─────────────────────────────────────┘
//!        │      delivered / given up
//!        └──────────────────────────────────── AwaitingCompletion (unicast)
//! ```
//!
//! At most one [`CommandSession`] is open.  A count that resolves while a
//! session is open is dropped: no transmission, no menu.  The menu is
//! re-rendered only when the coordinator returns to `AwaitingInput`.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::drivers::debouncer::Debouncer;
use crate::error::{CommandError, CommsError};
use crate::events::{LinkEvent, NodeEvent};
use crate::radio::address::{BROADCAST_PORT, DOOR_PORT, GATE_PORT, SAUNA_PORT};
use crate::radio::{
    self, BroadcastChannel, Message, NodeAddress, Port, ReliableUnicastChannel, SendOutcome,
    UnicastOutcome,
};
use crate::runtime::Node;
use crate::scheduler::{Millis, Scheduler};
use crate::sensors::history::NO_MEASUREMENT;

use super::commands::{Command, Route};
use super::events::AppEvent;
use super::menu::Menu;
use super::ports::{EventSink, NodePorts};

/// Observable coordinator state, derived from the session and debouncer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    AwaitingInput,
    Counting,
    Dispatching,
    AwaitingCompletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CoordinatorTimer {
    Debounce,
}

/// The command currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSession {
    pub command: Command,
    pub route: Route,
}

pub struct Coordinator {
    timers: Scheduler<CoordinatorTimer>,
    debouncer: Debouncer,
    broadcast: BroadcastChannel,
    door: ReliableUnicastChannel,
    gate: ReliableUnicastChannel,
    sauna: ReliableUnicastChannel,
    alarm_active: bool,
    locked: bool,
    session: Option<CommandSession>,
}

impl Coordinator {
    pub fn new(config: &SystemConfig) -> Self {
        let retx = config.max_retransmissions;
        Self {
            timers: Scheduler::new(),
            debouncer: Debouncer::new(config.coordinator_debounce_ms),
            broadcast: BroadcastChannel::new(BROADCAST_PORT),
            door: ReliableUnicastChannel::new(DOOR_PORT, retx),
            gate: ReliableUnicastChannel::new(GATE_PORT, retx),
            sauna: ReliableUnicastChannel::new(SAUNA_PORT, retx),
            alarm_active: false,
            locked: false,
            session: None,
        }
    }

    pub fn state(&self) -> CoordinatorState {
        match self.session {
            Some(CommandSession {
                route: Route::Broadcast,
                ..
            }) => CoordinatorState::Dispatching,
            Some(_) => CoordinatorState::AwaitingCompletion,
            None if self.debouncer.is_counting() => CoordinatorState::Counting,
            None => CoordinatorState::AwaitingInput,
        }
    }

    pub fn session(&self) -> Option<CommandSession> {
        self.session
    }

    /// Mirror of the actuator nodes' alarm.
    pub fn alarm_active(&self) -> bool {
        self.alarm_active
    }

    /// Mirror of the gate lock.  Updated optimistically on dispatch and
    /// left as is when delivery gives up.
    pub fn lock_mirror(&self) -> bool {
        self.locked
    }

    pub fn menu(&self) -> Menu {
        Menu::build(self.alarm_active, self.locked)
    }

    // ── Command resolution ────────────────────────────────────────

    fn resolve<P: NodePorts>(&mut self, presses: u8, io: &mut P) {
        if let Some(open) = self.session {
            debug!(
                "Count {} dropped: {} still in flight",
                presses, open.command
            );
            return;
        }

        let command = match Command::from_code(presses) {
            Ok(c) => c,
            Err(reason) => return self.reject(presses, reason, io),
        };
        if self.alarm_active && command != Command::ToggleAlarm {
            return self.reject(presses, CommandError::NotAvailable(presses), io);
        }
        self.dispatch(command, io);
    }

    fn reject<P: NodePorts>(&mut self, code: u8, reason: CommandError, io: &mut P) {
        warn!("Rejected: {}", reason);
        io.emit(&AppEvent::CommandRejected { code, reason });
        self.render_menu(io);
    }

    fn dispatch<P: NodePorts>(&mut self, command: Command, io: &mut P) {
        let msg = Message::Command(command);
        let route = command.route();
        let sent = match route {
            Route::Broadcast => self.broadcast.send(io, &msg),
            Route::Unicast(to) => match self.channel_to(to) {
                Some(channel) => channel.send(io, to, &msg),
                None => {
                    warn!("No channel to {}", to);
                    return;
                }
            },
        };

        match sent {
            Ok(SendOutcome::Queued) => {
                self.session = Some(CommandSession { command, route });
                match command {
                    Command::ToggleAlarm => self.alarm_active = !self.alarm_active,
                    Command::ToggleLock => self.locked = !self.locked,
                    _ => {}
                }
                match route {
                    Route::Broadcast => info!("Broadcasting command {}", command.code()),
                    Route::Unicast(to) => info!("Sending command {} to {}", command.code(), to),
                }
                io.emit(&AppEvent::CommandDispatched(command));
            }
            Ok(SendOutcome::DroppedBusy) => debug!("{} dropped: channel busy", command),
            Err(e) => {
                warn!("{} not sent: {}", command, e);
                self.render_menu(io);
            }
        }
    }

    // ── Completions ───────────────────────────────────────────────

    fn on_link<P: NodePorts>(&mut self, ev: LinkEvent, io: &mut P) {
        match ev {
            LinkEvent::BroadcastSent {
                port,
                status,
                transmissions,
            } if port == BROADCAST_PORT => {
                self.broadcast.on_sent(status, transmissions);
                if matches!(self.session, Some(s) if s.route == Route::Broadcast) {
                    self.close_session(io);
                }
            }
            LinkEvent::UnicastSent {
                port,
                to,
                retransmissions,
            } => {
                if let Some(channel) = self.channel_on(port) {
                    let outcome = channel.on_sent(to, retransmissions);
                    self.on_unicast_outcome(outcome, io);
                }
            }
            LinkEvent::UnicastTimedOut {
                port,
                to,
                retransmissions,
            } => {
                if let Some(channel) = self.channel_on(port) {
                    let outcome = channel.on_timed_out(to, retransmissions);
                    self.on_unicast_outcome(outcome, io);
                }
            }
            LinkEvent::UnicastReceived {
                port,
                from,
                seqno,
                frame,
            } => {
                info!("runicast message received from {}, seqno {}", from, seqno);
                if let Some(msg) = radio::decode_received(port, from, &frame) {
                    self.on_reply(port, msg, io);
                }
            }
            other => debug!("Coordinator: ignoring {:?}", other),
        }
    }

    fn on_unicast_outcome<P: NodePorts>(&mut self, outcome: UnicastOutcome, io: &mut P) {
        let (to, failure) = match outcome {
            UnicastOutcome::Delivered { to, .. } => (to, None),
            UnicastOutcome::GivenUp { to, retransmissions } => {
                (to, Some(CommsError::GivenUp { retransmissions }))
            }
        };
        let Some(open) = self.session.filter(|s| s.route == Route::Unicast(to)) else {
            debug!("Unicast outcome for {} with no matching session", to);
            return;
        };
        if let Some(error) = failure {
            warn!("{} failed: {}", open.command, error);
            io.emit(&AppEvent::DeliveryFailed {
                command: open.command,
                error,
            });
        }
        self.close_session(io);
    }

    fn on_reply<P: NodePorts>(&mut self, port: Port, msg: Message, io: &mut P) {
        let event = match (port, msg) {
            (DOOR_PORT, Message::Reading(v)) => {
                AppEvent::TemperatureReport((v != NO_MEASUREMENT).then_some(v))
            }
            (GATE_PORT, Message::Reading(v)) => AppEvent::LightReport(v),
            (SAUNA_PORT, Message::ModeSelected(mode)) => AppEvent::SteamRoomModeSelected(mode),
            (SAUNA_PORT, Message::SessionEnded) => AppEvent::SteamRoomSessionEnded,
            (port, msg) => {
                warn!("Unexpected {:?} on port {}", msg, port);
                return;
            }
        };
        io.emit(&event);
    }

    fn close_session<P: NodePorts>(&mut self, io: &mut P) {
        if let Some(done) = self.session.take() {
            debug!("Session for {} closed", done.command);
        }
        self.render_menu(io);
    }

    fn render_menu(&self, io: &mut impl EventSink) {
        io.emit(&AppEvent::MenuRendered(self.menu()));
    }

    // ── Channel lookup ────────────────────────────────────────────

    fn channel_to(&mut self, to: NodeAddress) -> Option<&mut ReliableUnicastChannel> {
        let port = to.reliable_port()?;
        self.channel_on(port)
    }

    fn channel_on(&mut self, port: Port) -> Option<&mut ReliableUnicastChannel> {
        match port {
            DOOR_PORT => Some(&mut self.door),
            GATE_PORT => Some(&mut self.gate),
            SAUNA_PORT => Some(&mut self.sauna),
            _ => None,
        }
    }
}

impl Node for Coordinator {
    fn address(&self) -> NodeAddress {
        NodeAddress::COORDINATOR
    }

    fn start<P: NodePorts>(&mut self, _now: Millis, io: &mut P) {
        io.emit(&AppEvent::Started(NodeAddress::COORDINATOR));
        info!("Coordinator started");
        self.render_menu(io);
    }

    fn handle<P: NodePorts>(&mut self, event: NodeEvent, now: Millis, io: &mut P) {
        match event {
            NodeEvent::ButtonPressed => {
                let deadline = self.debouncer.on_press(now);
                self.timers.arm_once(CoordinatorTimer::Debounce, deadline);
            }
            NodeEvent::Link(ev) => self.on_link(ev, io),
        }
    }

    fn fire_due<P: NodePorts>(&mut self, now: Millis, io: &mut P) -> bool {
        let Some(CoordinatorTimer::Debounce) = self.timers.pop_due(now) else {
            return false;
        };
        if let Some(presses) = self.debouncer.expire(now) {
            info!("Button pressed {} times", presses);
            self.resolve(presses, io);
        }
        true
    }

    fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }
}

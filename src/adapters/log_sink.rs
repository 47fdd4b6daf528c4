//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events through the
//! `log` facade.  On the coordinator this is the user's console: the menu,
//! query answers and failures all come out here.

use log::{error, info, warn};

use crate::app::events::{AppEvent, EntryPhase, ShutdownReason};
use crate::app::ports::EventSink;
use crate::radio::NodeAddress;

/// Adapter that logs every [`AppEvent`], tagged with the emitting node.
pub struct LogEventSink {
    node: NodeAddress,
}

impl LogEventSink {
    pub fn new(node: NodeAddress) -> Self {
        Self { node }
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        let n = self.node;
        match event {
            AppEvent::Started(addr) => info!("[{n}] START | node {addr}"),
            AppEvent::MenuRendered(menu) => {
                info!("[{n}] Select a command by pressing the button N times:");
                for entry in menu.entries() {
                    info!("[{n}]   {}. {}", entry.command.code(), entry.label);
                }
            }
            AppEvent::CommandDispatched(cmd) => info!("[{n}] CMD | {} sent", cmd),
            AppEvent::CommandRejected { reason, .. } => warn!("[{n}] CMD | {}", reason),
            AppEvent::TemperatureReport(Some(t)) => info!("[{n}] Temperature: {t}"),
            AppEvent::TemperatureReport(None) => info!("[{n}] No measurement available yet"),
            AppEvent::LightReport(lux) => info!("[{n}] Light: {lux}"),
            AppEvent::DeliveryFailed { command, error } => {
                warn!("[{n}] CMD | {} timed out: {}", command, error);
            }
            AppEvent::SteamRoomModeSelected(mode) => info!("[{n}] Steam room: {mode} mode"),
            AppEvent::SteamRoomSessionEnded => info!("[{n}] Steam room: session ended"),
            AppEvent::AlarmChanged { active } => {
                info!("[{n}] ALARM | {}", if *active { "on" } else { "off" });
            }
            AppEvent::LockChanged { locked } => {
                info!("[{n}] GATE | {}", if *locked { "locked" } else { "unlocked" });
            }
            AppEvent::Entry(phase) => {
                let what = match phase {
                    EntryPhase::Armed => "armed",
                    EntryPhase::Blinking => "blinking",
                    EntryPhase::Finished => "finished",
                    EntryPhase::Aborted => "aborted",
                };
                info!("[{n}] ENTRY | {what}");
            }
            AppEvent::EntryIgnored => info!("[{n}] ENTRY | ignored"),
            AppEvent::GardenLightsChanged { on } => {
                info!("[{n}] GARDEN | lights {}", if *on { "on" } else { "off" });
            }
            AppEvent::SteamRoomSwitchedOn => info!("[{n}] STEAM | on, select a mode"),
            AppEvent::SessionStarted(mode) => info!("[{n}] STEAM | {mode} mode"),
            AppEvent::Measurement {
                temperature_c,
                humidity_percent,
            } => info!("[{n}] STEAM | T={temperature_c}\u{00b0}C H={humidity_percent}%"),
            AppEvent::SelectionRejected { presses } => {
                warn!("[{n}] STEAM | {presses} presses is not a mode");
            }
            AppEvent::SessionShutdown(ShutdownReason::Manual) => info!("[{n}] STEAM | off"),
            AppEvent::SessionShutdown(reason) => error!("[{n}] STEAM | shut down: {reason}"),
        }
    }
}

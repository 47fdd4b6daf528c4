//! Outbound application events.
//!
//! Nodes emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Adapters on the other side decide what to do with them: print
//! the console menu, log, or record them for a test.

use core::fmt;

use crate::error::{CommandError, CommsError};
use crate::radio::NodeAddress;
use crate::safety::Violation;

use super::commands::{Command, Mode};
use super::menu::Menu;

/// Why a steam-room session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// ToggleSteamRoom received while the room was on.
    Manual,
    /// The safety session ran out.
    SafetyTimeout,
    /// A consecutive-violation counter reached its limit.
    Breach(Violation),
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "switched off"),
            Self::SafetyTimeout => write!(f, "safety timer expired"),
            Self::Breach(v) => write!(f, "{v}"),
        }
    }
}

/// Phases of the timed entry sequence on one actuator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPhase {
    /// OpenEntry accepted; the door node is now waiting out its delay.
    Armed,
    /// Blinking started.
    Blinking,
    /// Window elapsed, indicators restored.
    Finished,
    /// Aborted by the alarm.
    Aborted,
}

/// Structured events emitted by the node state machines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A node started.
    Started(NodeAddress),

    // ── Coordinator ───────────────────────────────────────
    /// The valid-command list was (re)rendered.
    MenuRendered(Menu),
    /// A resolved command was handed to its channel.
    CommandDispatched(Command),
    /// A resolved count was rejected before any transmission.
    CommandRejected { code: u8, reason: CommandError },
    /// Door node answered QueryTemperature; `None` when it had no samples.
    TemperatureReport(Option<i16>),
    /// Gate node answered QueryLight.
    LightReport(i16),
    /// An addressed command gave up.
    DeliveryFailed { command: Command, error: CommsError },
    /// Sauna node reported its selected mode.
    SteamRoomModeSelected(Mode),
    /// Sauna node reported the end of its session.
    SteamRoomSessionEnded,

    // ── Actuator nodes ────────────────────────────────────
    AlarmChanged { active: bool },
    LockChanged { locked: bool },
    Entry(EntryPhase),
    /// OpenEntry arrived while the alarm was active or a sequence was live.
    EntryIgnored,
    GardenLightsChanged { on: bool },

    // ── Sauna node ────────────────────────────────────────
    SteamRoomSwitchedOn,
    SessionStarted(Mode),
    Measurement { temperature_c: i16, humidity_percent: i16 },
    SelectionRejected { presses: u8 },
    SessionShutdown(ShutdownReason),
}

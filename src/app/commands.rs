//! User commands and steam-room modes.
//!
//! On the wire and at the button both are small integers.  They are
//! decoded exactly once, here, into closed enums; every other module works
//! with the typed values.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::radio::address::NodeAddress;

/// How a command reaches its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Best-effort broadcast to every actuator node.
    Broadcast,
    /// Reliable unicast to one node.
    Unicast(NodeAddress),
}

/// Commands the coordinator can issue.  The discriminant is the press
/// count that selects it and the code carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Command {
    ToggleAlarm = 1,
    ToggleLock = 2,
    OpenEntry = 3,
    QueryTemperature = 4,
    QueryLight = 5,
    ToggleSteamRoom = 6,
}

impl Command {
    /// Every command, in menu order.
    pub const ALL: [Command; 6] = [
        Command::ToggleAlarm,
        Command::ToggleLock,
        Command::OpenEntry,
        Command::QueryTemperature,
        Command::QueryLight,
        Command::ToggleSteamRoom,
    ];

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Result<Self, CommandError> {
        match code {
            1 => Ok(Self::ToggleAlarm),
            2 => Ok(Self::ToggleLock),
            3 => Ok(Self::OpenEntry),
            4 => Ok(Self::QueryTemperature),
            5 => Ok(Self::QueryLight),
            6 => Ok(Self::ToggleSteamRoom),
            other => Err(CommandError::Unknown(other)),
        }
    }

    /// Where the coordinator sends this command.
    pub const fn route(self) -> Route {
        match self {
            Self::ToggleAlarm | Self::OpenEntry => Route::Broadcast,
            Self::ToggleLock | Self::QueryLight => Route::Unicast(NodeAddress::GATE),
            Self::QueryTemperature => Route::Unicast(NodeAddress::DOOR),
            Self::ToggleSteamRoom => Route::Unicast(NodeAddress::SAUNA),
        }
    }

    pub const fn is_broadcast(self) -> bool {
        matches!(self.route(), Route::Broadcast)
    }
}

impl From<Command> for u8 {
    fn from(c: Command) -> Self {
        c.code()
    }
}

impl TryFrom<u8> for Command {
    type Error = CommandError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToggleAlarm => write!(f, "toggle alarm"),
            Self::ToggleLock => write!(f, "toggle lock"),
            Self::OpenEntry => write!(f, "open entry"),
            Self::QueryTemperature => write!(f, "query temperature"),
            Self::QueryLight => write!(f, "query light"),
            Self::ToggleSteamRoom => write!(f, "toggle steam room"),
        }
    }
}

/// Steam-room treatment selected on the sauna node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Mode {
    Sauna = 1,
    SteamBath = 2,
}

impl Mode {
    /// Map a resolved press count to a mode.
    pub const fn from_presses(presses: u8) -> Option<Self> {
        match presses {
            1 => Some(Self::Sauna),
            2 => Some(Self::SteamBath),
            _ => None,
        }
    }
}

impl From<Mode> for u8 {
    fn from(m: Mode) -> Self {
        m as u8
    }
}

impl TryFrom<u8> for Mode {
    type Error = CommandError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_presses(code).ok_or(CommandError::Unknown(code))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sauna => write!(f, "sauna"),
            Self::SteamBath => write!(f, "steam bath"),
        }
    }
}

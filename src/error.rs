//! Unified error types for the smart-home nodes.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the node event loops' error handling uniform. All variants are `Copy`
//! so they can be carried inside outbound events without allocation.
//!
//! Note that a busy channel and a missing measurement are *not* errors at
//! the call site: a busy send is dropped and reported through
//! [`SendOutcome`](crate::radio::SendOutcome), and a missing measurement
//! travels as the [`NO_MEASUREMENT`](crate::sensors::history::NO_MEASUREMENT)
//! sentinel.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A radio channel failed to deliver.
    Comms(CommsError),
    /// A resolved command was rejected before transmission.
    Command(CommandError),
    /// A frame could not be encoded or decoded.
    Wire(WireError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Wire(e) => write!(f, "wire: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// The reliable channel exhausted its retransmission bound.
    GivenUp { retransmissions: u8 },
    /// A node's inbox was full and the event was discarded.
    InboxFull,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GivenUp { retransmissions } => {
                write!(f, "gave up after {retransmissions} retransmissions")
            }
            Self::InboxFull => write!(f, "inbox full"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Reasons a resolved press count never reaches the radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The count does not name a command.
    Unknown(u8),
    /// The command exists but is disabled while the alarm is active.
    NotAvailable(u8),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "command {code} not found"),
            Self::NotAvailable(code) => write!(f, "command {code} not available"),
        }
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Wire errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireError {
    /// The message did not fit in a frame.
    Oversize,
    /// The frame bytes are not a valid message.
    Malformed,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oversize => write!(f, "message exceeds frame size"),
            Self::Malformed => write!(f, "malformed frame"),
        }
    }
}

impl From<WireError> for Error {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;

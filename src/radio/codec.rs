//! Radio frame codec.
//!
//! Wire format: one `postcard`-encoded [`Message`], at most
//! [`MAX_FRAME_SIZE`] bytes.
//!
//! ```text
//! ┌──────────────┬────────────────────────────┐
//! │ variant (1B) │ payload (0–3B)             │
//! │              │ code u8 │ zigzag i16 │ —   │
//! └──────────────┴────────────────────────────┘
//! ```
//!
//! Command and mode codes travel as their integer values and are checked
//! on decode, so a frame carrying an unknown code never reaches a node's
//! state machine.

use serde::{Deserialize, Serialize};

use crate::app::commands::{Command, Mode};
use crate::error::{Result, WireError};

/// Maximum frame payload size.
pub const MAX_FRAME_SIZE: usize = 8;

/// Encoded frame bytes.
pub type Frame = heapless::Vec<u8, MAX_FRAME_SIZE>;

/// Everything that travels between nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Coordinator → node command.
    Command(Command),
    /// Node → coordinator measurement (temperature average, light level).
    Reading(i16),
    /// Sauna → coordinator: a treatment was selected.
    ModeSelected(Mode),
    /// Sauna → coordinator: the session ended on any shutdown path.
    SessionEnded,
}

/// Encode `msg` into a frame.
pub fn encode(msg: &Message) -> Result<Frame> {
    let mut buf = [0u8; MAX_FRAME_SIZE];
    let used = postcard::to_slice(msg, &mut buf).map_err(|_| WireError::Oversize)?;
    Ok(Frame::from_slice(used).map_err(|()| WireError::Oversize)?)
}

/// Decode a frame into a message.
pub fn decode(frame: &[u8]) -> Result<Message> {
    if frame.len() > MAX_FRAME_SIZE {
        return Err(WireError::Oversize.into());
    }
    Ok(postcard::from_bytes(frame).map_err(|_| WireError::Malformed)?)
}

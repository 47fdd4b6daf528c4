//! Radio messaging contracts.
//!
//! ```text
//!   node state machine
//!        │ send()                       ▲ on_sent / on_timed_out
//!        ▼                              │ (queued NodeEvent::Link)
//!   BroadcastChannel / ReliableUnicastChannel
//!        │ LinkLayer::broadcast / unicast
//!        ▼
//!   supplied transport (retransmission, ack, duplicate suppression)
//! ```
//!
//! The channels only track *whether* a send is outstanding.  Completion is
//! reported by the transport as a [`LinkEvent`](crate::events::LinkEvent)
//! queued into the owning node's run loop, so a completion can never run
//! in the middle of another handler.

pub mod address;
pub mod broadcast;
pub mod codec;
pub mod unicast;

use core::fmt;

use log::warn;

pub use address::{NodeAddress, Port};
pub use broadcast::BroadcastChannel;
pub use codec::{Frame, Message};
pub use unicast::{ReliableUnicastChannel, UnicastOutcome};

/// Result of handing a message to a channel.
///
/// A busy channel is not an error: the message is discarded, nothing is
/// transmitted and the caller carries on.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The frame was handed to the transport.
    Queued,
    /// The channel already had a send outstanding; the message was dropped.
    DroppedBusy,
}

impl SendOutcome {
    pub fn is_queued(self) -> bool {
        matches!(self, Self::Queued)
    }
}

/// Local transmission status reported on broadcast completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Ok,
    Collision,
    NoAck,
    Failed,
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Collision => write!(f, "collision"),
            Self::NoAck => write!(f, "no ack"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Link layer port (driven adapter: domain → radio)
// ───────────────────────────────────────────────────────────────

/// The supplied transport.  Implementations queue the frame and later
/// deliver the matching completion event to the sending node.
pub trait LinkLayer {
    /// Best-effort send to every listener on `port`.
    fn broadcast(&mut self, port: Port, frame: &[u8]);

    /// Reliable send to `to` with at most `max_retransmissions` retries.
    fn unicast(&mut self, port: Port, to: NodeAddress, frame: &[u8], max_retransmissions: u8);
}

/// Decode a received frame, logging and discarding anything malformed.
pub fn decode_received(port: Port, from: NodeAddress, frame: &[u8]) -> Option<Message> {
    match codec::decode(frame) {
        Ok(msg) => Some(msg),
        Err(e) => {
            warn!("port {port}: dropped frame from {from}: {e}");
            None
        }
    }
}

//! Best-effort one-to-all channel.
//!
//! The only completion signal is local: the transport reports when its
//! outgoing queue is free again.  No node ever acknowledges a broadcast.

use log::{debug, info, warn};

use super::address::Port;
use super::codec::{self, Message};
use super::{LinkLayer, SendOutcome, TxStatus};
use crate::error::Result;

pub struct BroadcastChannel {
    port: Port,
    in_flight: bool,
}

impl BroadcastChannel {
    pub const fn new(port: Port) -> Self {
        Self {
            port,
            in_flight: false,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    /// Whether a local transmission is still outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Hand `msg` to the transport.  Dropped if a previous broadcast has
    /// not completed locally.
    pub fn send<L: LinkLayer + ?Sized>(&mut self, link: &mut L, msg: &Message) -> Result<SendOutcome> {
        if self.in_flight {
            debug!("broadcast {}: busy, dropped {:?}", self.port, msg);
            return Ok(SendOutcome::DroppedBusy);
        }
        let frame = codec::encode(msg)?;
        link.broadcast(self.port, &frame);
        self.in_flight = true;
        debug!("broadcast {}: sent {:?}", self.port, msg);
        Ok(SendOutcome::Queued)
    }

    /// Local send completion.  Frees the channel.
    pub fn on_sent(&mut self, status: TxStatus, transmissions: u8) {
        if !self.in_flight {
            warn!("broadcast {}: completion with nothing in flight", self.port);
        }
        self.in_flight = false;
        info!(
            "broadcast message sent, status {}, transmissions {}",
            status, transmissions
        );
    }
}

//! Reliable one-to-one channel.
//!
//! The transport retransmits up to a fixed bound and terminates every
//! accepted send in exactly one of two outcomes: delivered or given up.
//! One send may be outstanding per channel; a send while busy is
//! discarded without transmission and without queuing.

use log::{debug, info, warn};

use super::address::{NodeAddress, Port};
use super::codec::{self, Message};
use super::{LinkLayer, SendOutcome};
use crate::error::{CommsError, Result};

/// Terminal outcome of one accepted send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnicastOutcome {
    Delivered { to: NodeAddress, retransmissions: u8 },
    GivenUp { to: NodeAddress, retransmissions: u8 },
}

impl UnicastOutcome {
    pub fn into_result(self) -> core::result::Result<u8, CommsError> {
        match self {
            Self::Delivered { retransmissions, .. } => Ok(retransmissions),
            Self::GivenUp { retransmissions, .. } => Err(CommsError::GivenUp { retransmissions }),
        }
    }
}

pub struct ReliableUnicastChannel {
    port: Port,
    max_retransmissions: u8,
    pending: Option<NodeAddress>,
}

impl ReliableUnicastChannel {
    pub const fn new(port: Port, max_retransmissions: u8) -> Self {
        Self {
            port,
            max_retransmissions,
            pending: None,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Destination of the outstanding send, if any.
    pub fn pending_target(&self) -> Option<NodeAddress> {
        self.pending
    }

    /// Send `msg` to `to`.
    pub fn send<L: LinkLayer + ?Sized>(
        &mut self,
        link: &mut L,
        to: NodeAddress,
        msg: &Message,
    ) -> Result<SendOutcome> {
        if let Some(target) = self.pending {
            debug!(
                "unicast {}: busy with {}, dropped {:?} for {}",
                self.port, target, msg, to
            );
            return Ok(SendOutcome::DroppedBusy);
        }
        let frame = codec::encode(msg)?;
        link.unicast(self.port, to, &frame, self.max_retransmissions);
        self.pending = Some(to);
        debug!("unicast {}: sent {:?} to {}", self.port, msg, to);
        Ok(SendOutcome::Queued)
    }

    /// Transport confirmed delivery.
    pub fn on_sent(&mut self, to: NodeAddress, retransmissions: u8) -> UnicastOutcome {
        self.settle(to);
        info!(
            "runicast message sent to {}, retransmissions {}",
            to, retransmissions
        );
        UnicastOutcome::Delivered {
            to,
            retransmissions,
        }
    }

    /// Transport exhausted its retransmission bound.
    pub fn on_timed_out(&mut self, to: NodeAddress, retransmissions: u8) -> UnicastOutcome {
        self.settle(to);
        warn!(
            "runicast message timed out when sending to {}, retransmissions {}",
            to, retransmissions
        );
        UnicastOutcome::GivenUp {
            to,
            retransmissions,
        }
    }

    // ── Internal ──────────────────────────────────────────────────

    fn settle(&mut self, to: NodeAddress) {
        match self.pending.take() {
            Some(target) if target != to => {
                warn!("unicast {}: completion for {} while {} pending", self.port, to, target);
            }
            None => warn!("unicast {}: completion with nothing pending", self.port),
            Some(_) => {}
        }
    }
}

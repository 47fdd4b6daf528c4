//! Node input events.
//!
//! Everything that can wake a node arrives as a [`NodeEvent`] in its
//! bounded inbox:
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Button      │────▶│              │     │              │
//! │ Radio rx    │────▶│  Node inbox  │────▶│  Run loop    │
//! │ Tx complete │────▶│  (bounded)   │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//!                                                ▲
//!                                     due timers ┘ (after the inbox)
//! ```
//!
//! Events are handled strictly in arrival order, one at a time, to
//! completion.  Timers are not events: the run loop pops them from the
//! node's [`Scheduler`](crate::scheduler::Scheduler) once the inbox is empty.

use crate::radio::{Frame, NodeAddress, Port, TxStatus};

/// Capacity of each node's inbox.
pub const INBOX_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeEvent {
    /// The node's button was pressed once.
    ButtonPressed,
    /// The transport delivered something.
    Link(LinkEvent),
}

/// Transport callbacks, queued rather than invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    // ── Broadcast ─────────────────────────────────────────
    BroadcastReceived {
        port: Port,
        from: NodeAddress,
        frame: Frame,
    },
    /// Local completion of this node's own broadcast.
    BroadcastSent {
        port: Port,
        status: TxStatus,
        transmissions: u8,
    },

    // ── Reliable unicast ──────────────────────────────────
    UnicastReceived {
        port: Port,
        from: NodeAddress,
        seqno: u16,
        frame: Frame,
    },
    /// This node's send was acknowledged.
    UnicastSent {
        port: Port,
        to: NodeAddress,
        retransmissions: u8,
    },
    /// This node's send exhausted its retransmission bound.
    UnicastTimedOut {
        port: Port,
        to: NodeAddress,
        retransmissions: u8,
    },
}

impl LinkEvent {
    pub fn port(&self) -> Port {
        match self {
            Self::BroadcastReceived { port, .. }
            | Self::BroadcastSent { port, .. }
            | Self::UnicastReceived { port, .. }
            | Self::UnicastSent { port, .. }
            | Self::UnicastTimedOut { port, .. } => *port,
        }
    }
}

impl From<LinkEvent> for NodeEvent {
    fn from(ev: LinkEvent) -> Self {
        Self::Link(ev)
    }
}

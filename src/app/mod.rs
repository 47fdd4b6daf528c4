//! Application layer: the four node state machines behind port traits.
//!
//! ```text
//!   IndicatorPort ──┐                        ┌──▶ EventSink
//!   SensorPort ─────┼──▶ Coordinator ·       │
//!   LinkLayer ◀─────┘    DoorNode · GateNode ┘
//!                        SaunaNode
//! ```

pub mod actuator;
pub mod commands;
pub mod coordinator;
pub mod door;
pub mod events;
pub mod gate;
pub mod menu;
pub mod ports;
pub mod sauna;

use log::{debug, warn};

use crate::radio::{Message, NodeAddress, ReliableUnicastChannel, SendOutcome};

use ports::NodePorts;

/// Send a node-initiated message on `channel`.  Busy sends are dropped
/// like any other.  Returns whether the frame was queued.
pub(crate) fn send_reliable<P: NodePorts>(
    channel: &mut ReliableUnicastChannel,
    io: &mut P,
    to: NodeAddress,
    msg: Message,
) -> bool {
    match channel.send(io, to, &msg) {
        Ok(SendOutcome::Queued) => true,
        Ok(SendOutcome::DroppedBusy) => {
            debug!("{:?} to {} dropped: channel busy", msg, to);
            false
        }
        Err(e) => {
            warn!("{:?} to {} not sent: {}", msg, to, e);
            false
        }
    }
}

//! Static addressing.
//!
//! Four nodes, four well-known two-byte link addresses, and one channel
//! port per traffic class.  There is no discovery and no routing.
//!
//! | Node        | Address | Reliable port | Broadcast (129) |
//! |-------------|---------|---------------|-----------------|
//! | door        | 1.0     | 144           | listens         |
//! | gate        | 2.0     | 145           | listens         |
//! | coordinator | 3.0     | 144/145/146   | sends           |
//! | sauna       | 4.0     | 146           | —               |

use core::fmt;

use serde::{Deserialize, Serialize};

/// Channel port number (Rime-style channel identifier).
pub type Port = u16;

/// Broadcast group shared by the coordinator and both actuator nodes.
pub const BROADCAST_PORT: Port = 129;
/// Reliable channel coordinator ↔ door node.
pub const DOOR_PORT: Port = 144;
/// Reliable channel coordinator ↔ gate node.
pub const GATE_PORT: Port = 145;
/// Reliable channel coordinator ↔ sauna node.
pub const SAUNA_PORT: Port = 146;

/// Two-byte link-layer address, written `id.sub`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeAddress {
    pub id: u8,
    pub sub: u8,
}

impl NodeAddress {
    pub const DOOR: Self = Self::new(1, 0);
    pub const GATE: Self = Self::new(2, 0);
    pub const COORDINATOR: Self = Self::new(3, 0);
    pub const SAUNA: Self = Self::new(4, 0);

    /// Every node in the network.
    pub const ALL: [Self; 4] = [Self::DOOR, Self::GATE, Self::COORDINATOR, Self::SAUNA];

    pub const fn new(id: u8, sub: u8) -> Self {
        Self { id, sub }
    }

    /// Reliable channel port used between the coordinator and this node.
    pub const fn reliable_port(self) -> Option<Port> {
        match self.id {
            1 => Some(DOOR_PORT),
            2 => Some(GATE_PORT),
            4 => Some(SAUNA_PORT),
            _ => None,
        }
    }

    /// Whether this node has the broadcast group open.
    pub const fn listens_broadcast(self) -> bool {
        matches!(self.id, 1..=3)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.id, self.sub)
    }
}

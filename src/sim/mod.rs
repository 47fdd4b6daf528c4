//! Whole-network simulation on a virtual clock.
//!
//! Wires the four nodes to a shared [`Medium`] and advances time from one
//! interesting instant to the next: at every instant the medium first
//! delivers everything due, then each node runs its inbox and its due
//! timers, then every frame sent is handed back to the medium.
//!
//! ```text
//!   ┌─────────────┐  post   ┌────────────┐  outbox  ┌─────────┐
//!   │   Medium    │ ──────▶ │ NodeRuntime│ ───────▶ │ Medium  │
//!   │ (deliveries)│         │  × 4       │          │.transmit│
//!   └─────────────┘         └────────────┘          └─────────┘
//! ```

pub mod hardware;
pub mod medium;

use log::{info, warn};

use crate::app::coordinator::Coordinator;
use crate::app::door::DoorNode;
use crate::app::gate::GateNode;
use crate::app::sauna::SaunaNode;
use crate::config::SystemConfig;
use crate::error::{CommsError, Result};
use crate::events::NodeEvent;
use crate::radio::NodeAddress;
use crate::runtime::{Node, NodeRuntime};
use crate::scheduler::Millis;

pub use hardware::{ScriptedSensor, SimPorts, Transmission};
pub use medium::{Medium, SimSettings};

pub struct Simulation {
    now: Millis,
    medium: Medium,
    coordinator: NodeRuntime<Coordinator, SimPorts>,
    door: NodeRuntime<DoorNode, SimPorts>,
    gate: NodeRuntime<GateNode, SimPorts>,
    sauna: NodeRuntime<SaunaNode, SimPorts>,
}

impl Simulation {
    /// Build and start all four nodes at t = 0.
    pub fn new(config: &SystemConfig, settings: SimSettings) -> Result<Self> {
        config.validate()?;
        settings.validate()?;

        let mut sim = Self {
            now: 0,
            medium: Medium::new(settings),
            coordinator: NodeRuntime::new(
                Coordinator::new(config),
                SimPorts::new(NodeAddress::COORDINATOR),
            ),
            door: NodeRuntime::new(DoorNode::new(config), SimPorts::new(NodeAddress::DOOR)),
            gate: NodeRuntime::new(GateNode::new(config), SimPorts::new(NodeAddress::GATE)),
            sauna: NodeRuntime::new(SaunaNode::new(config), SimPorts::new(NodeAddress::SAUNA)),
        };
        sim.coordinator.start(0);
        sim.door.start(0);
        sim.gate.start(0);
        sim.sauna.start(0);
        sim.flush();
        info!("Simulation started");
        Ok(sim)
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn medium_mut(&mut self) -> &mut Medium {
        &mut self.medium
    }

    // ── Input ─────────────────────────────────────────────────────

    /// Press `node`'s button once, now.
    pub fn press(&mut self, node: NodeAddress) -> Result<()> {
        self.post(node, NodeEvent::ButtonPressed)?;
        self.step(self.now);
        Ok(())
    }

    /// Press `node`'s button `times` times in the current instant.
    pub fn press_n(&mut self, node: NodeAddress, times: u8) -> Result<()> {
        for _ in 0..times {
            self.press(node)?;
        }
        Ok(())
    }

    // ── Time ──────────────────────────────────────────────────────

    /// Run every delivery and timer up to and including `target`.
    pub fn advance_to(&mut self, target: Millis) {
        while let Some(next) = self.next_instant() {
            if next > target {
                break;
            }
            self.step(next.max(self.now));
        }
        self.now = self.now.max(target);
        self.sync_clocks();
    }

    pub fn advance(&mut self, delta: Millis) {
        self.advance_to(self.now + delta);
    }

    // ── Inspection ────────────────────────────────────────────────

    pub fn coordinator(&self) -> &Coordinator {
        self.coordinator.node()
    }

    pub fn door(&self) -> &DoorNode {
        self.door.node()
    }

    pub fn gate(&self) -> &GateNode {
        self.gate.node()
    }

    pub fn sauna(&self) -> &SaunaNode {
        self.sauna.node()
    }

    pub fn ports(&self, node: NodeAddress) -> Option<&SimPorts> {
        match node {
            NodeAddress::COORDINATOR => Some(self.coordinator.ports()),
            NodeAddress::DOOR => Some(self.door.ports()),
            NodeAddress::GATE => Some(self.gate.ports()),
            NodeAddress::SAUNA => Some(self.sauna.ports()),
            _ => None,
        }
    }

    pub fn ports_mut(&mut self, node: NodeAddress) -> Option<&mut SimPorts> {
        match node {
            NodeAddress::COORDINATOR => Some(self.coordinator.ports_mut()),
            NodeAddress::DOOR => Some(self.door.ports_mut()),
            NodeAddress::GATE => Some(self.gate.ports_mut()),
            NodeAddress::SAUNA => Some(self.sauna.ports_mut()),
            _ => None,
        }
    }

    // ── Internal ──────────────────────────────────────────────────

    fn next_instant(&self) -> Option<Millis> {
        [
            self.medium.next_at(),
            self.coordinator.next_deadline(),
            self.door.next_deadline(),
            self.gate.next_deadline(),
            self.sauna.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    fn step(&mut self, now: Millis) {
        self.now = now;
        while let Some((to, event)) = self.medium.pop_due(now) {
            if let Err(e) = self.post(to, event) {
                warn!("delivery to {} lost: {}", to, e);
            }
        }
        self.sync_clocks();
        self.coordinator.run(now);
        self.door.run(now);
        self.gate.run(now);
        self.sauna.run(now);
        self.flush();
    }

    fn post(&mut self, to: NodeAddress, event: NodeEvent) -> core::result::Result<(), CommsError> {
        match to {
            NodeAddress::COORDINATOR => self.coordinator.post(event),
            NodeAddress::DOOR => self.door.post(event),
            NodeAddress::GATE => self.gate.post(event),
            NodeAddress::SAUNA => self.sauna.post(event),
            other => {
                warn!("no node at {}", other);
                Ok(())
            }
        }
    }

    fn sync_clocks(&mut self) {
        let now = self.now;
        self.coordinator.ports_mut().set_now(now);
        self.door.ports_mut().set_now(now);
        self.gate.ports_mut().set_now(now);
        self.sauna.ports_mut().set_now(now);
    }

    fn flush(&mut self) {
        let now = self.now;
        let sent = [
            (self.coordinator.node().address(), self.coordinator.ports_mut().take_outbox()),
            (self.door.node().address(), self.door.ports_mut().take_outbox()),
            (self.gate.node().address(), self.gate.ports_mut().take_outbox()),
            (self.sauna.node().address(), self.sauna.ports_mut().take_outbox()),
        ];
        for (from, frames) in sent {
            for tx in frames {
                self.medium.transmit(now, from, tx);
            }
        }
    }
}

//! Cooperative per-node run loop.
//!
//! Every node is driven by one [`NodeRuntime`]: a bounded inbox of
//! [`NodeEvent`]s plus the node's own timers.  [`NodeRuntime::run`] drains
//! the inbox in arrival order, then fires every timer due at `now`, each
//! handler running to completion before the next starts.  Nothing in a
//! node is touched from anywhere else, so no locking is needed.
//!
//! ```text
//!   post(ev) ──▶ ┌──────────┐  FIFO  ┌──────────────┐
//!                │  inbox   │──────▶ │ node.handle  │
//!                └──────────┘        └──────────────┘
//!                 then, while due:   ┌──────────────┐
//!                                    │ node.fire_due│
//!                                    └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use log::{trace, warn};

use crate::app::ports::NodePorts;
use crate::error::CommsError;
use crate::events::{INBOX_CAPACITY, NodeEvent};
use crate::radio::NodeAddress;
use crate::scheduler::Millis;

/// A node state machine.
pub trait Node {
    fn address(&self) -> NodeAddress;

    /// One-time initialisation (initial indicators, free-running loops).
    fn start<P: NodePorts>(&mut self, now: Millis, io: &mut P);

    /// Handle one queued event to completion.
    fn handle<P: NodePorts>(&mut self, event: NodeEvent, now: Millis, io: &mut P);

    /// Fire the earliest timer due at `now`.  Returns `false` when none is.
    fn fire_due<P: NodePorts>(&mut self, now: Millis, io: &mut P) -> bool;

    /// Earliest armed timer.
    fn next_deadline(&self) -> Option<Millis>;
}

/// A node, its port bundle and its inbox.
pub struct NodeRuntime<N, P> {
    node: N,
    ports: P,
    inbox: Channel<NoopRawMutex, NodeEvent, INBOX_CAPACITY>,
}

impl<N: Node, P: NodePorts> NodeRuntime<N, P> {
    pub fn new(node: N, ports: P) -> Self {
        Self {
            node,
            ports,
            inbox: Channel::new(),
        }
    }

    pub fn start(&mut self, now: Millis) {
        self.node.start(now, &mut self.ports);
    }

    /// Queue an event.  A full inbox drops it.
    pub fn post(&self, event: NodeEvent) -> Result<(), CommsError> {
        self.inbox.try_send(event).map_err(|_| {
            warn!("{}: inbox full, event dropped", self.node.address());
            CommsError::InboxFull
        })
    }

    /// Whether anything is queued.
    pub fn has_pending(&self) -> bool {
        !self.inbox.is_empty()
    }

    /// Run everything that is ready at `now`: queued events first, then
    /// due timers.  Returns the number of handlers run.
    pub fn run(&mut self, now: Millis) -> usize {
        let mut ran = 0;
        while let Ok(event) = self.inbox.try_receive() {
            trace!("{}: {:?}", self.node.address(), event);
            self.node.handle(event, now, &mut self.ports);
            ran += 1;
        }
        while self.node.fire_due(now, &mut self.ports) {
            ran += 1;
        }
        ran
    }

    pub fn next_deadline(&self) -> Option<Millis> {
        self.node.next_deadline()
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn ports(&self) -> &P {
        &self.ports
    }

    pub fn ports_mut(&mut self) -> &mut P {
        &mut self.ports
    }
}

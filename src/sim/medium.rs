//! Deterministic radio medium.
//!
//! Stands in for the supplied transport: it turns [`Transmission`]s into
//! timed [`LinkEvent`]s for the receivers and the sender.
//!
//! ```text
//!   broadcast at t:   every listener ── BroadcastReceived @ t+L
//!                     sender ────────── BroadcastSent     @ t+L
//!
//!   unicast at t, first k attempts lost (k ≤ R):
//!                     receiver ──────── UnicastReceived   @ t+k·I+L
//!                     sender ────────── UnicastSent(k)    @ t+k·I+2L
//!   unicast at t, unreachable or k > R:
//!                     sender ────────── UnicastTimedOut(R) @ t+(R+1)·I
//! ```
//!
//! `L` is the hop latency, `I` the retransmission interval, `R` the
//! sender's retransmission bound.  Deliveries at the same instant keep
//! scheduling order.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::events::{LinkEvent, NodeEvent};
use crate::radio::{NodeAddress, TxStatus};
use crate::scheduler::Millis;

use super::hardware::Transmission;

/// Medium behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// One-hop latency (ms); at least 1 so a send never lands in the
    /// instant it was made.
    pub hop_latency_ms: Millis,
    /// Delay between unicast attempts (ms).
    pub retransmit_interval_ms: Millis,
    /// Attempts lost before a unicast gets through.
    pub lossy_attempts: u8,
    /// Nodes that neither send nor receive.
    pub unreachable: Vec<NodeAddress>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            hop_latency_ms: 10,
            retransmit_interval_ms: 1_000,
            lossy_attempts: 0,
            unreachable: Vec::new(),
        }
    }
}

impl SimSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hop_latency_ms == 0 {
            return Err(ConfigError::ValidationFailed("hop latency must be at least 1 ms"));
        }
        if self.retransmit_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "retransmit interval must be non-zero",
            ));
        }
        Ok(())
    }

    fn reachable(&self, node: NodeAddress) -> bool {
        !self.unreachable.contains(&node)
    }
}

pub struct Medium {
    settings: SimSettings,
    queue: BTreeMap<(Millis, u64), (NodeAddress, NodeEvent)>,
    next_seq: u64,
    seqnos: BTreeMap<NodeAddress, u16>,
}

impl Medium {
    pub fn new(settings: SimSettings) -> Self {
        Self {
            settings,
            queue: BTreeMap::new(),
            next_seq: 0,
            seqnos: BTreeMap::new(),
        }
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SimSettings {
        &mut self.settings
    }

    /// Instant of the next scheduled delivery.
    pub fn next_at(&self) -> Option<Millis> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Pop the next delivery due at `now`.
    pub fn pop_due(&mut self, now: Millis) -> Option<(NodeAddress, NodeEvent)> {
        match self.queue.first_key_value() {
            Some(((at, _), _)) if *at <= now => self.queue.pop_first().map(|(_, d)| d),
            _ => None,
        }
    }

    /// Accept a frame sent by `from` at `now`.
    pub fn transmit(&mut self, now: Millis, from: NodeAddress, tx: Transmission) {
        let latency = self.settings.hop_latency_ms;
        match tx {
            Transmission::Broadcast { port, frame } => {
                let sender_up = self.settings.reachable(from);
                for to in NodeAddress::ALL {
                    if to == from || !to.listens_broadcast() || !sender_up || !self.settings.reachable(to) {
                        continue;
                    }
                    self.schedule(
                        now + latency,
                        to,
                        LinkEvent::BroadcastReceived {
                            port,
                            from,
                            frame: frame.clone(),
                        },
                    );
                }
                let status = if sender_up { TxStatus::Ok } else { TxStatus::Failed };
                self.schedule(
                    now + latency,
                    from,
                    LinkEvent::BroadcastSent {
                        port,
                        status,
                        transmissions: 1,
                    },
                );
            }
            Transmission::Unicast {
                port,
                to,
                frame,
                max_retransmissions,
            } => {
                let interval = self.settings.retransmit_interval_ms;
                let lost = self.settings.lossy_attempts;
                let link_up = self.settings.reachable(from) && self.settings.reachable(to);

                if !link_up || lost > max_retransmissions {
                    let at = now + (Millis::from(max_retransmissions) + 1) * interval;
                    self.schedule(
                        at,
                        from,
                        LinkEvent::UnicastTimedOut {
                            port,
                            to,
                            retransmissions: max_retransmissions,
                        },
                    );
                    return;
                }

                let attempt_at = now + Millis::from(lost) * interval;
                let seqno = self.next_seqno(from);
                self.schedule(
                    attempt_at + latency,
                    to,
                    LinkEvent::UnicastReceived {
                        port,
                        from,
                        seqno,
                        frame,
                    },
                );
                self.schedule(
                    attempt_at + 2 * latency,
                    from,
                    LinkEvent::UnicastSent {
                        port,
                        to,
                        retransmissions: lost,
                    },
                );
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────────

    fn schedule(&mut self, at: Millis, to: NodeAddress, ev: LinkEvent) {
        debug!("medium: {:?} for {} at t={}ms", ev, to, at);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.insert((at, seq), (to, NodeEvent::Link(ev)));
    }

    fn next_seqno(&mut self, from: NodeAddress) -> u16 {
        let slot = self.seqnos.entry(from).or_insert(0);
        let seqno = *slot;
        *slot = slot.wrapping_add(1);
        seqno
    }
}

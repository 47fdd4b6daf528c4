//! smarthome-sim: host simulation of the four-node smart-home network.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Simulation (virtual clock)                │
//! │                                                                │
//! │   Coordinator 3.0      DoorNode 1.0    GateNode 2.0   Sauna 4.0│
//! │        │                    │              │             │     │
//! │  ──────┴────── SimPorts (indicators, sensors, link) ─────┴──── │
//! │                                                                │
//! │                   Medium (latency, loss, retries)              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `smarthome-sim [scenario.json]`.  Without a scenario file a
//! built-in demo runs.  Set `RUST_LOG` to change verbosity.
#![deny(unused_must_use)]

use std::{env, fs};

use anyhow::{Context, Result};
use log::info;
use serde::Deserialize;

use smarthome::config::SystemConfig;
use smarthome::radio::NodeAddress;
use smarthome::sim::{SimSettings, Simulation};

/// Which node's button a press targets.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NodeName {
    Coordinator,
    Door,
    Gate,
    Sauna,
}

impl NodeName {
    fn address(self) -> NodeAddress {
        match self {
            Self::Coordinator => NodeAddress::COORDINATOR,
            Self::Door => NodeAddress::DOOR,
            Self::Gate => NodeAddress::GATE,
            Self::Sauna => NodeAddress::SAUNA,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct Press {
    at_ms: u64,
    node: NodeName,
    #[serde(default = "one")]
    times: u8,
}

fn one() -> u8 {
    1
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Scenario {
    config: SystemConfig,
    settings: SimSettings,
    presses: Vec<Press>,
    /// Keep running this long after the last press.
    tail_ms: Option<u64>,
}

impl Scenario {
    fn demo() -> Self {
        let press = |at_ms, node, times| Press { at_ms, node, times };
        Self {
            presses: vec![
                // Open door and gate, then raise and clear the alarm.
                press(1_000, NodeName::Coordinator, 3),
                press(30_000, NodeName::Coordinator, 1),
                press(40_000, NodeName::Coordinator, 2),
                press(50_000, NodeName::Coordinator, 1),
                // Lock the gate, ask for temperature and light.
                press(60_000, NodeName::Coordinator, 2),
                press(70_000, NodeName::Coordinator, 4),
                press(80_000, NodeName::Coordinator, 5),
                // Garden lights on.
                press(85_000, NodeName::Door, 1),
                // Steam room on, steam-bath mode.
                press(90_000, NodeName::Coordinator, 6),
                press(100_000, NodeName::Sauna, 2),
            ],
            tail_ms: Some(90_000),
            ..Default::default()
        }
    }

    fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()?;

    let mut scenario = match env::args().nth(1) {
        Some(path) => Scenario::load(&path)?,
        None => {
            info!("No scenario given, running the demo");
            Scenario::demo()
        }
    };
    scenario.presses.sort_by_key(|p| p.at_ms);

    let mut sim = Simulation::new(&scenario.config, scenario.settings.clone())?;
    for p in &scenario.presses {
        sim.advance_to(p.at_ms);
        sim.press_n(p.node.address(), p.times)?;
    }
    sim.advance(scenario.tail_ms.unwrap_or(60_000));

    info!(
        "Done at t={}ms: alarm={} locked={} steam room={:?}",
        sim.now(),
        sim.coordinator().alarm_active(),
        sim.gate().is_locked(),
        sim.sauna().state()
    );
    Ok(())
}

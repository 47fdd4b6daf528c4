//! Smart-home WSAN control library.
//!
//! Pure node logic (coordinator, door, gate, sauna) behind port traits,
//! plus a deterministic simulator for host testing.  Hardware-facing code
//! lives only in [`adapters`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod events;
pub mod radio;
pub mod runtime;
pub mod safety;
pub mod scheduler;
pub mod sensors;
pub mod sim;

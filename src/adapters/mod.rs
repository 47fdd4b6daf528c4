//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements     | Connects to                  |
//! |-------------|----------------|------------------------------|
//! | `gpio`      | IndicatorPort  | three `embedded-hal` outputs |
//! | `log_sink`  | EventSink      | `log` facade / console       |
//!
//! The simulated radio and sensors live in [`crate::sim`].

pub mod gpio;
pub mod log_sink;

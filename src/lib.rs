// src/lib.rs

//! Driver for Loadstar DI-100/DI-1000 indicators and iLoad capacitive load cells.
//!
//! A [`LoadstarSensor`] opens the serial link, queries the device with `MODEL`,
//! `SS1` and (DI-100 class only) `UNITS`, and from the answers picks the
//! continuous/single command verbs. Streaming then yields one [`Reading`] per
//! fixed-width 14-byte frame.

pub mod channel;
pub mod common;
pub mod sensor;

// Re-export key types for convenience
pub use channel::SerialChannel;
pub use common::{LoadstarError, Reading, SettleTimings};
pub use sensor::{LoadstarSensor, SensorIdentity, SessionConfig, StreamState};

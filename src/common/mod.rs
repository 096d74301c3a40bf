// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod timing;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::Command;

// From error.rs
pub use error::LoadstarError;

// From frame.rs
pub use frame::{parse_frame, FrameParseError, Parity, SerialFraming, FRAME_LEN};

// From hal_traits.rs
pub use hal_traits::{Delay, SerialLink, StdDelay};

// From timing.rs (constants stay under common::timing::*)
pub use timing::SettleTimings;

// From types.rs
pub use types::{Classification, QuantityType, Reading, SensorFamily};

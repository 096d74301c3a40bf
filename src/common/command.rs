//! Loadstar command definitions.
//!
//! Every command is plain ASCII terminated by a single carriage return.
//! The sensor never echoes a command back and has no addressing. The
//! family-specific streaming verbs live on `SensorFamily`.

use core::fmt::{self, Write};

use arrayvec::ArrayString;

use super::LoadstarError;

/// Command terminator.
pub const TERMINATOR: char = '\r';

/// Capacity of the formatting buffer, terminator included.
pub const MAX_COMMAND_LEN: usize = 16;

/// Represents one identity query or control command sent to the sensor.
///
/// The `Display` implementation yields the command text *without* the terminator
/// (e.g. `MODEL`). Use [`Command::format_into`] for the bytes that go on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// `MODEL` - free-text model string.
    Model,

    /// `SS1` - serial id, prefix-coded by quantity type.
    SerialId,

    /// `UNITS` - units string. Only DI-100 class devices answer this.
    Units,

    /// Bare terminator - halts streaming.
    Stop,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Model => f.write_str("MODEL"),
            Command::SerialId => f.write_str("SS1"),
            Command::Units => f.write_str("UNITS"),
            Command::Stop => Ok(()),
        }
    }
}

impl Command {
    /// Formats the command plus terminator into a fixed-capacity buffer.
    pub fn format_into<E: fmt::Debug>(
        &self,
    ) -> Result<ArrayString<MAX_COMMAND_LEN>, LoadstarError<E>> {
        let mut buf = ArrayString::<MAX_COMMAND_LEN>::new();
        write!(buf, "{}{}", self, TERMINATOR).map_err(|_| LoadstarError::CommandTooLong {
            needed: self.to_string().len() + 1,
            max: MAX_COMMAND_LEN,
        })?;
        Ok(buf)
    }
}

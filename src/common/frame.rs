// src/common/frame.rs

use core::fmt;
use core::str::{self, FromStr};

/// Width of one streamed reading on the wire. There is no delimiter scanning:
/// the stream is cut into consecutive 14-byte chunks.
pub const FRAME_LEN: usize = 14;

/// Parity setting of a serial framing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

/// Byte framing of the serial line.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SerialFraming {
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: Parity,
    pub flow_control: bool,
}

impl SerialFraming {
    /// Framing used by every DI-100/DI-1000 and iLoad device: 8 data bits, 1 stop bit,
    /// no parity, no flow control.
    pub const LOADSTAR_8N1: SerialFraming = SerialFraming {
        data_bits: 8,
        stop_bits: 1,
        parity: Parity::None,
        flow_control: false,
    };
}

impl Default for SerialFraming {
    fn default() -> Self {
        Self::LOADSTAR_8N1
    }
}

/// Error while decoding a 14-byte frame as a number.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameParseError {
    InvalidUtf8,
    Empty,
    InvalidNumber,
}

impl fmt::Display for FrameParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FrameParseError::*;
        match self {
            InvalidUtf8 => write!(f, "frame is not valid UTF-8"),
            Empty => write!(f, "frame contains only padding"),
            InvalidNumber => write!(f, "frame text is not a decimal number"),
        }
    }
}

/// Parses one frame, e.g. `b"    123.45000\r"`, into its numeric value.
///
/// Leading and trailing padding (spaces, CR/LF, other control bytes) is ignored.
pub fn parse_frame(frame: &[u8; FRAME_LEN]) -> Result<f64, FrameParseError> {
    let text = str::from_utf8(frame).map_err(|_| FrameParseError::InvalidUtf8)?;
    let trimmed = text.trim_matches(|c: char| c <= ' ');
    if trimmed.is_empty() {
        return Err(FrameParseError::Empty);
    }
    f64::from_str(trimmed).map_err(|_| FrameParseError::InvalidNumber)
}

// src/common/error.rs

use super::frame::{FrameParseError, FRAME_LEN};

#[derive(Debug, thiserror::Error)]
pub enum LoadstarError<E = ()>
where
    E: core::fmt::Debug, // Still need Debug for the generic Io error
{
    /// Underlying I/O error from the serial link implementation.
    #[error("I/O error: {0:?}")] // Format string requires Debug on E
    Io(E),

    /// The requested port does not exist or could not be opened.
    #[error("Serial channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// A read or write was attempted while the channel is closed.
    #[error("Serial channel is closed")]
    ChannelClosed,

    /// A streamed frame did not decode as a number.
    /// Usually means the byte stream drifted out of frame alignment.
    #[error("Unparseable frame {:?}: {reason}", String::from_utf8_lossy(.frame))]
    FrameParse { frame: [u8; FRAME_LEN], reason: FrameParseError },

    /// A streaming-only operation was attempted while Idle.
    #[error("Sensor is not streaming")]
    NotStreaming,

    /// The operation requires the Idle state.
    #[error("Sensor is already streaming")]
    AlreadyStreaming,

    /// Command text does not fit the fixed formatting buffer.
    #[error("Command too long: needed {needed}, max {max}")]
    CommandTooLong { needed: usize, max: usize },
}

impl<E: core::fmt::Debug> LoadstarError<E> {
    /// True for errors raised by the framing/parsing layer rather than the link.
    pub fn is_frame_error(&self) -> bool {
        matches!(self, LoadstarError::FrameParse { .. })
    }
}

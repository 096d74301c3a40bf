// src/sensor/streaming.rs

use super::LoadstarSensor;
use crate::common::{
    command::Command,
    error::LoadstarError,
    frame::{parse_frame, FRAME_LEN},
    hal_traits::{Delay, SerialLink},
    types::Reading,
};
use chrono::Local;
use core::mem;
use log::{info, warn};

/// Streaming state of a session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StreamState {
    /// No frame consumer armed; command exchanges are allowed.
    Idle,
    /// The device is free-running and inbound bytes are frames.
    Streaming,
}

impl<L, D> LoadstarSensor<L, D>
where
    L: SerialLink,
    D: Delay,
{
    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_streaming(&self) -> bool {
        self.state == StreamState::Streaming
    }

    /// Idle -> Streaming. Arms the frame consumer, then sends the family's
    /// continuous command and waits for the device to start talking.
    pub fn start_reading(&mut self) -> Result<(), LoadstarError<L::Error>> {
        if self.state == StreamState::Streaming {
            return Err(LoadstarError::AlreadyStreaming);
        }
        self.channel.open()?;

        let wire = self.identity.continuous_command();
        self.state = StreamState::Streaming;
        if let Err(e) = self.channel.write_and_wait(
            &mut self.delay,
            wire.as_bytes(),
            self.timings.stream_start_settle,
        ) {
            self.state = StreamState::Idle;
            return Err(e);
        }

        info!("streaming from {} ({:?})", self.port_name(), wire);
        Ok(())
    }

    /// Streaming -> Idle. Sends the bare terminator, closes the channel and
    /// disarms the frame consumer.
    ///
    /// Safe to call when already Idle: the device just sees one more stop.
    pub fn stop_reading(&mut self) -> Result<(), LoadstarError<L::Error>> {
        let was = mem::replace(&mut self.state, StreamState::Idle);

        self.channel.open()?;
        let wire = Command::Stop.format_into::<L::Error>()?;
        let written = self.channel.write_and_wait(
            &mut self.delay,
            wire.as_bytes(),
            self.timings.stream_stop_settle,
        );
        let closed = self.channel.close();

        if was == StreamState::Streaming {
            info!("stopped streaming from {}", self.port_name());
        }
        written?;
        closed
    }

    /// Consumes one frame if a whole one is buffered.
    ///
    /// Returns `WouldBlock` while fewer than 14 bytes are waiting; nothing is
    /// read in that case. A frame that does not parse is reported as
    /// `FrameParse` and consumed, so the next call tries the following frame.
    pub fn poll_reading(&mut self) -> nb::Result<Reading, LoadstarError<L::Error>> {
        if self.state != StreamState::Streaming {
            return Err(nb::Error::Other(LoadstarError::NotStreaming));
        }
        if self.channel.bytes_available().map_err(nb::Error::Other)? < FRAME_LEN {
            return Err(nb::Error::WouldBlock);
        }

        let mut frame = [0u8; FRAME_LEN];
        self.channel.read_exact(&mut frame).map_err(nb::Error::Other)?;
        self.decode(&frame).map_err(nb::Error::Other)
    }

    /// Blocking iterator over streamed readings. Ends once the session is Idle.
    ///
    /// Holding it borrows the session mutably, so there is only ever one
    /// frame consumer.
    pub fn readings(&mut self) -> Readings<'_, L, D> {
        Readings {
            sensor: self,
            done: false,
        }
    }

    /// Requests one frame with the family's single command. Idle only.
    pub fn read_single(&mut self) -> Result<Reading, LoadstarError<L::Error>> {
        if self.state == StreamState::Streaming {
            return Err(LoadstarError::AlreadyStreaming);
        }
        self.channel.open()?;

        let wire = self.identity.single_command();
        self.channel
            .write_and_wait(&mut self.delay, wire.as_bytes(), self.timings.write_settle)?;
        self.delay.delay(self.timings.response_settle);

        let mut frame = [0u8; FRAME_LEN];
        self.channel.read_exact(&mut frame)?;
        self.decode(&frame)
    }

    fn decode(&mut self, frame: &[u8; FRAME_LEN]) -> Result<Reading, LoadstarError<L::Error>> {
        match parse_frame(frame) {
            Ok(value) => {
                // Never step backwards, even if the wall clock does.
                let now = Local::now();
                let timestamp = match self.last_timestamp {
                    Some(last) if last > now => last,
                    _ => now,
                };
                self.last_timestamp = Some(timestamp);
                Ok(Reading::new(timestamp, value))
            }
            Err(reason) => {
                warn!(
                    "bad frame {:?} from {}: {}",
                    String::from_utf8_lossy(frame),
                    self.port_name(),
                    reason
                );
                Err(LoadstarError::FrameParse { frame: *frame, reason })
            }
        }
    }
}

/// Lazy, unbounded sequence of readings from a streaming session.
///
/// Bad frames are yielded as errors and the sequence goes on. Any other
/// error (link failure, closed channel) is yielded once and ends it.
pub struct Readings<'a, L, D>
where
    L: SerialLink,
    D: Delay,
{
    sensor: &'a mut LoadstarSensor<L, D>,
    done: bool,
}

impl<L, D> Readings<'_, L, D>
where
    L: SerialLink,
    D: Delay,
{
    /// Stops the stream and releases the session borrow.
    pub fn stop(self) -> Result<(), LoadstarError<L::Error>> {
        self.sensor.stop_reading()
    }
}

impl<L, D> Iterator for Readings<'_, L, D>
where
    L: SerialLink,
    D: Delay,
{
    type Item = Result<Reading, LoadstarError<L::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            match self.sensor.poll_reading() {
                Ok(reading) => return Some(Ok(reading)),
                Err(nb::Error::WouldBlock) => {
                    let interval = self.sensor.timings.frame_poll_interval;
                    self.sensor.delay.delay(interval);
                }
                Err(nb::Error::Other(LoadstarError::NotStreaming)) => return None,
                Err(nb::Error::Other(e)) if e.is_frame_error() => return Some(Err(e)),
                Err(nb::Error::Other(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

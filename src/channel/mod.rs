// src/channel/mod.rs

// Serial channel: open/closed lifecycle plus the timed write and the raw
// read primitives everything above it is built on.

#[cfg(feature = "serialport")]
pub mod native;

#[cfg(feature = "serialport")]
pub use native::NativeLink;

use crate::common::{
    error::LoadstarError,
    hal_traits::{Delay, SerialLink},
};
use core::time::Duration;
use log::debug;

/// Exclusive owner of one serial link.
///
/// Nothing is written or read while the channel is closed, and every write
/// discards stale buffered bytes first so responses and frames start aligned.
#[derive(Debug)]
pub struct SerialChannel<L: SerialLink> {
    link: L,
}

impl<L: SerialLink> SerialChannel<L> {
    /// Wraps a link without opening it.
    pub fn new(link: L) -> Self {
        SerialChannel { link }
    }

    pub fn port_name(&self) -> &str {
        self.link.port_name()
    }

    pub fn baud_rate(&self) -> u32 {
        self.link.baud_rate()
    }

    pub fn is_open(&self) -> bool {
        self.link.is_open()
    }

    /// Opens the link. No-op if already open.
    pub fn open(&mut self) -> Result<(), LoadstarError<L::Error>> {
        if self.link.is_open() {
            return Ok(());
        }
        self.link.open().map_err(|e| {
            LoadstarError::ChannelUnavailable(format!("{}: {:?}", self.link.port_name(), e))
        })?;
        debug!(
            "opened {} at {} baud",
            self.link.port_name(),
            self.link.baud_rate()
        );
        Ok(())
    }

    /// Closes the link. No-op if already closed.
    pub fn close(&mut self) -> Result<(), LoadstarError<L::Error>> {
        if !self.link.is_open() {
            return Ok(());
        }
        self.link.close().map_err(LoadstarError::Io)?;
        debug!("closed {}", self.link.port_name());
        Ok(())
    }

    /// Flushes buffered input/output, writes `bytes`, then blocks for `settle`
    /// so the device can react. Does not read anything back.
    pub fn write_and_wait<D: Delay>(
        &mut self,
        delay: &mut D,
        bytes: &[u8],
        settle: Duration,
    ) -> Result<(), LoadstarError<L::Error>> {
        self.ensure_open()?;
        self.link.clear_buffers().map_err(LoadstarError::Io)?;
        self.link.write_all(bytes).map_err(LoadstarError::Io)?;
        debug!("-> {:?} (settle {:?})", String::from_utf8_lossy(bytes), settle);
        delay.delay(settle);
        Ok(())
    }

    /// Count of received bytes not yet read.
    pub fn bytes_available(&mut self) -> Result<usize, LoadstarError<L::Error>> {
        self.ensure_open()?;
        self.link.bytes_available().map_err(LoadstarError::Io)
    }

    /// Reads exactly `buf.len()` bytes.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), LoadstarError<L::Error>> {
        self.ensure_open()?;
        self.link.read_exact(buf).map_err(LoadstarError::Io)
    }

    /// Discards anything still buffered.
    pub fn clear(&mut self) -> Result<(), LoadstarError<L::Error>> {
        self.ensure_open()?;
        self.link.clear_buffers().map_err(LoadstarError::Io)
    }

    fn ensure_open(&self) -> Result<(), LoadstarError<L::Error>> {
        if self.link.is_open() {
            Ok(())
        } else {
            Err(LoadstarError::ChannelClosed)
        }
    }
}

// src/common/hal_traits.rs

use core::fmt::Debug;
use core::time::Duration;

/// Abstraction for the blocking settle delays the protocol relies on.
pub trait Delay {
    /// Block the calling flow for at least `duration`.
    fn delay(&mut self, duration: Duration);
}

/// Abstraction over a byte-oriented serial connection to one sensor.
///
/// Implementations own the physical port and its framing. They are not
/// expected to be safe to drive from two flows at once; `SerialChannel`
/// serialises access through `&mut self`.
pub trait SerialLink {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Human readable port identifier (e.g. `/dev/ttyUSB0`, `COM3`).
    fn port_name(&self) -> &str;

    /// Configured baud rate.
    fn baud_rate(&self) -> u32;

    /// Opens the underlying port.
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Releases the underlying port.
    fn close(&mut self) -> Result<(), Self::Error>;

    fn is_open(&self) -> bool;

    /// Discards any buffered input and output.
    fn clear_buffers(&mut self) -> Result<(), Self::Error>;

    /// Writes all of `bytes`.
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Number of received bytes waiting to be read. A snapshot only.
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// Fills `buf` completely, blocking until enough bytes arrive or the
    /// implementation gives up.
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;
}

/// `Delay` backed by `std::thread::sleep`.
#[derive(Debug, Default, Copy, Clone)]
pub struct StdDelay;

impl Delay for StdDelay {
    fn delay(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

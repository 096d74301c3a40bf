// src/common/timing.rs

use core::time::Duration;

// The devices are driven with fixed sleep-based timing: every write is followed
// by a settle pause before anything is read back. None of these are hard
// real-time bounds, they are what the DI-100/DI-1000 and iLoad firmware need in
// practice.

// === Command/Response Timing ===

/// Pause after writing an identity query (`MODEL`, `SS1`, `UNITS`).
pub const WRITE_SETTLE: Duration = Duration::from_millis(10);
/// Additional pause before draining a query response.
pub const RESPONSE_SETTLE: Duration = Duration::from_millis(250);

// === Streaming Timing ===

/// Pause after the continuous command so the device is streaming before the caller proceeds.
pub const STREAM_START_SETTLE: Duration = Duration::from_millis(500);
/// Pause after the bare terminator that halts streaming.
pub const STREAM_STOP_SETTLE: Duration = Duration::from_millis(500);
/// Sleep between polls while waiting for a full frame to accumulate.
pub const FRAME_POLL_INTERVAL: Duration = Duration::from_millis(5);

// === Port Defaults ===

/// Baud rate the reference CLI opens sensors with.
pub const DEFAULT_BAUD_RATE: u32 = 9600;
/// Blocking timeout for a single native port read.
pub const PORT_READ_TIMEOUT: Duration = Duration::from_millis(1000);

/// Settle delays used by one sensor session.
///
/// `Default` gives the constants above. Tune per device here rather than in
/// the protocol code.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SettleTimings {
    pub write_settle: Duration,
    pub response_settle: Duration,
    pub stream_start_settle: Duration,
    pub stream_stop_settle: Duration,
    pub frame_poll_interval: Duration,
}

impl Default for SettleTimings {
    fn default() -> Self {
        SettleTimings {
            write_settle: WRITE_SETTLE,
            response_settle: RESPONSE_SETTLE,
            stream_start_settle: STREAM_START_SETTLE,
            stream_stop_settle: STREAM_STOP_SETTLE,
            frame_poll_interval: FRAME_POLL_INTERVAL,
        }
    }
}

impl SettleTimings {
    /// All delays zero. Handy for simulated links.
    pub const fn immediate() -> Self {
        SettleTimings {
            write_settle: Duration::ZERO,
            response_settle: Duration::ZERO,
            stream_start_settle: Duration::ZERO,
            stream_stop_settle: Duration::ZERO,
            frame_poll_interval: Duration::ZERO,
        }
    }
}

// src/sensor/mod.rs

// One sensor session: owns the channel, the resolved identity and the
// streaming state. Building it queries the device; dropping it releases the port.

pub mod exchange;
pub mod identity;
pub mod streaming;

pub use identity::SensorIdentity;
pub use streaming::{Readings, StreamState};

use crate::channel::SerialChannel;
use crate::common::{
    error::LoadstarError,
    hal_traits::{Delay, SerialLink},
    timing::{self, SettleTimings},
};
use chrono::{DateTime, Local};
use core::fmt;
use log::warn;

/// Construction input supplied by whoever picked the port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub timings: SettleTimings,
}

impl SessionConfig {
    pub fn new(port_name: impl Into<String>) -> Self {
        SessionConfig {
            port_name: port_name.into(),
            baud_rate: timing::DEFAULT_BAUD_RATE,
            timings: SettleTimings::default(),
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timings(mut self, timings: SettleTimings) -> Self {
        self.timings = timings;
        self
    }
}

/// A connected Loadstar sensor.
pub struct LoadstarSensor<L, D>
where
    L: SerialLink,
    D: Delay,
{
    channel: SerialChannel<L>,
    delay: D,
    timings: SettleTimings,
    identity: SensorIdentity,
    state: StreamState,
    last_timestamp: Option<DateTime<Local>>,
}

impl<L, D> LoadstarSensor<L, D>
where
    L: SerialLink,
    D: Delay,
{
    /// Opens `link` and identifies the attached device.
    ///
    /// Fails with `ChannelUnavailable` if the port cannot be opened. A device
    /// that does not answer still yields a session (see `SensorIdentity`).
    pub fn new(
        link: L,
        mut delay: D,
        timings: SettleTimings,
    ) -> Result<Self, LoadstarError<L::Error>> {
        let mut channel = SerialChannel::new(link);
        let identity = identity::resolve(&mut channel, &mut delay, &timings)?;

        Ok(LoadstarSensor {
            channel,
            delay,
            timings,
            identity,
            state: StreamState::Idle,
            last_timestamp: None,
        })
    }

    pub fn identity(&self) -> &SensorIdentity {
        &self.identity
    }

    pub fn port_name(&self) -> &str {
        self.channel.port_name()
    }

    pub fn baud_rate(&self) -> u32 {
        self.channel.baud_rate()
    }

    pub fn timings(&self) -> &SettleTimings {
        &self.timings
    }

    pub fn channel(&self) -> &SerialChannel<L> {
        &self.channel
    }
}

#[cfg(feature = "serialport")]
impl LoadstarSensor<crate::channel::NativeLink, crate::common::hal_traits::StdDelay> {
    /// Opens a host serial port and identifies the sensor on it.
    pub fn open(config: SessionConfig) -> Result<Self, LoadstarError<serialport::Error>> {
        let link = crate::channel::NativeLink::new(config.port_name, config.baud_rate);
        Self::new(link, crate::common::hal_traits::StdDelay, config.timings)
    }
}

impl<L, D> fmt::Display for LoadstarSensor<L, D>
where
    L: SerialLink,
    D: Delay,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Port: {}, Baudrate: {}, Type: {}, Units: {}",
            self.identity.id(),
            self.port_name(),
            self.baud_rate(),
            self.identity.quantity(),
            self.identity.units()
        )
    }
}

impl<L, D> fmt::Debug for LoadstarSensor<L, D>
where
    L: SerialLink + fmt::Debug,
    D: Delay,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadstarSensor")
            .field("channel", &self.channel)
            .field("identity", &self.identity)
            .field("state", &self.state)
            .finish()
    }
}

impl<L, D> Drop for LoadstarSensor<L, D>
where
    L: SerialLink,
    D: Delay,
{
    fn drop(&mut self) {
        if self.state == StreamState::Streaming {
            if let Err(e) = self.stop_reading() {
                warn!("failed to stop streaming on {}: {}", self.port_name(), e);
            }
        }
        if let Err(e) = self.channel.close() {
            warn!("failed to close {}: {}", self.port_name(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::{scripted_link, MockDelay, MockLink};
    use crate::common::types::{QuantityType, SensorFamily};

    #[test]
    fn test_new_identifies_device() {
        let link = scripted_link(b"DI-1000 Rev2\r\n", b"TQ-0451\r\n", b"in-lb\r\n");
        let timings = SettleTimings::default();
        let sensor = LoadstarSensor::new(link.clone(), MockDelay::new(), timings).unwrap();

        assert_eq!(sensor.identity().family(), SensorFamily::Di100);
        assert_eq!(sensor.identity().quantity(), QuantityType::Torque);
        assert_eq!(sensor.port_name(), "/dev/ttyMOCK0");
        assert_eq!(sensor.baud_rate(), 9600);
        assert!(sensor.channel().is_open());
        assert!(!sensor.is_streaming());
    }

    #[test]
    fn test_banner() {
        let link = scripted_link(b"CapLoad-X\r\n", b"FT-99\r\n", b"");
        let sensor =
            LoadstarSensor::new(link, MockDelay::new(), SettleTimings::immediate()).unwrap();
        assert_eq!(
            sensor.to_string(),
            "ID: FT-99, Port: /dev/ttyMOCK0, Baudrate: 9600, \
             Type: Force and Temperature, Units: mLB/C"
        );
    }

    #[test]
    fn test_new_fails_when_port_unavailable() {
        let link = MockLink::new();
        link.set_fail_open(true);
        let result = LoadstarSensor::new(link, MockDelay::new(), SettleTimings::default());
        assert!(matches!(result, Err(LoadstarError::ChannelUnavailable(_))));
    }

    #[test]
    fn test_drop_releases_port() {
        let link = scripted_link(b"DI-100\r\n", b"DISP-3\r\n", b"in\r\n");
        let timings = SettleTimings::immediate();
        let sensor = LoadstarSensor::new(link.clone(), MockDelay::new(), timings).unwrap();
        assert!(link.state().open);

        drop(sensor);
        assert!(!link.state().open);
        // Idle session: nothing to stop.
        assert_eq!(link.count_writes("\r"), 0);
    }

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::new("COM3");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.timings, SettleTimings::default());
        assert_eq!(config.with_baud_rate(115200).baud_rate, 115200);
    }
}

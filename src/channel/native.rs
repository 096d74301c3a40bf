// src/channel/native.rs

//! `SerialLink` implementation on top of the `serialport` crate.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, ErrorKind, FlowControl, SerialPort, StopBits};

use crate::common::{
    frame::{Parity, SerialFraming},
    hal_traits::SerialLink,
    timing,
};

/// Host serial port, opened lazily with the Loadstar framing.
pub struct NativeLink {
    port_name: String,
    baud_rate: u32,
    framing: SerialFraming,
    timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
}

impl NativeLink {
    pub fn new(port_name: impl Into<String>, baud_rate: u32) -> Self {
        NativeLink {
            port_name: port_name.into(),
            baud_rate,
            framing: SerialFraming::LOADSTAR_8N1,
            timeout: timing::PORT_READ_TIMEOUT,
            port: None,
        }
    }

    /// Overrides the per-read blocking timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn framing(&self) -> SerialFraming {
        self.framing
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>, serialport::Error> {
        self.port
            .as_mut()
            .ok_or_else(|| serialport::Error::new(ErrorKind::NoDevice, "port is not open"))
    }
}

impl core::fmt::Debug for NativeLink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NativeLink")
            .field("port_name", &self.port_name)
            .field("baud_rate", &self.baud_rate)
            .field("framing", &self.framing)
            .field("open", &self.port.is_some())
            .finish()
    }
}

fn data_bits(framing: &SerialFraming) -> DataBits {
    match framing.data_bits {
        5 => DataBits::Five,
        6 => DataBits::Six,
        7 => DataBits::Seven,
        _ => DataBits::Eight,
    }
}

fn stop_bits(framing: &SerialFraming) -> StopBits {
    if framing.stop_bits == 2 {
        StopBits::Two
    } else {
        StopBits::One
    }
}

fn parity(framing: &SerialFraming) -> serialport::Parity {
    match framing.parity {
        Parity::None => serialport::Parity::None,
        Parity::Odd => serialport::Parity::Odd,
        Parity::Even => serialport::Parity::Even,
    }
}

impl SerialLink for NativeLink {
    type Error = serialport::Error;

    fn port_name(&self) -> &str {
        &self.port_name
    }

    fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    fn open(&mut self) -> Result<(), serialport::Error> {
        let flow_control = if self.framing.flow_control {
            FlowControl::Hardware
        } else {
            FlowControl::None
        };
        let port = serialport::new(&self.port_name, self.baud_rate)
            .data_bits(data_bits(&self.framing))
            .stop_bits(stop_bits(&self.framing))
            .parity(parity(&self.framing))
            .flow_control(flow_control)
            .timeout(self.timeout)
            .open()?;
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> Result<(), serialport::Error> {
        // Dropping the handle releases the OS port.
        self.port = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn clear_buffers(&mut self) -> Result<(), serialport::Error> {
        self.port_mut()?.clear(ClearBuffer::All)
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), serialport::Error> {
        let port = self.port_mut()?;
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    fn bytes_available(&mut self) -> Result<usize, serialport::Error> {
        Ok(self.port_mut()?.bytes_to_read()? as usize)
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), serialport::Error> {
        self.port_mut()?.read_exact(buf)?;
        Ok(())
    }
}

/// Names of the serial ports present on this machine.
pub fn available_port_names() -> Result<Vec<String>, serialport::Error> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect())
}

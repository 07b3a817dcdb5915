//! Serial link over a host serial port.

use crate::{Result, traits::SerialLink};
use portero_core::constants::BAUD_RATE;
use serialport::{DataBits, Parity, SerialPort, StopBits};
use std::io::{Read, Write};
use std::time::Duration;
use tracing::info;

/// Host serial port configured like the target UART (9600 8N1).
pub struct PortSerial {
    port: Box<dyn SerialPort>,
    name: String,
}

impl PortSerial {
    /// Open `path` at the target baud rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be opened.
    pub fn open(path: &str) -> Result<Self> {
        Self::open_with_baud(path, BAUD_RATE)
    }

    /// Open `path` at a custom baud rate.
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be opened.
    pub fn open_with_baud(path: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(Duration::from_millis(100))
            .open()?;

        info!("Opened serial port {} at {} baud", path, baud_rate);

        Ok(Self {
            port,
            name: path.to_string(),
        })
    }

    /// Get the port path.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for PortSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortSerial").field("name", &self.name).finish()
    }
}

impl SerialLink for PortSerial {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        if self.port.bytes_to_read()? == 0 {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        let read = self.port.read(&mut byte)?;
        Ok((read == 1).then_some(byte[0]))
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.port.write_all(&[byte])?;
        Ok(())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }
}

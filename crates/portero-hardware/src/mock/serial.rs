//! Mock serial link for testing and host emulation.
//!
//! The link is split in two halves connected by channels: the device side
//! implements [`SerialLink`] for the firmware, the handle side plays the
//! scanner (sending bytes in) and the report collector (reading bytes out).

use crate::{HardwareError, Result, traits::SerialLink};
use portero_core::constants::{CARRIAGE_RETURN, LINE_TERMINATOR};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Device side of a mock serial link.
///
/// # Examples
///
/// ```
/// use portero_hardware::mock::MockSerial;
/// use portero_hardware::traits::SerialLink;
///
/// let (mut link, mut handle) = MockSerial::new();
///
/// handle.send_code("12345678").unwrap();
/// let mut received = Vec::new();
/// while let Some(byte) = link.poll_byte().unwrap() {
///     received.push(byte);
/// }
/// assert_eq!(received, b"12345678\r");
///
/// link.write_all(b"hola\r\n").unwrap();
/// assert_eq!(handle.take_lines(), vec!["hola".to_string()]);
/// ```
#[derive(Debug)]
pub struct MockSerial {
    /// Bytes arriving from the scanner
    rx: mpsc::UnboundedReceiver<u8>,

    /// Bytes leaving towards the report collector
    tx: mpsc::UnboundedSender<u8>,

    /// Device name
    name: String,
}

impl MockSerial {
    /// Create a new mock link with the default name.
    pub fn new() -> (Self, MockSerialHandle) {
        Self::with_name("Mock UART".to_string())
    }

    /// Create a new mock link with a custom name.
    pub fn with_name(name: String) -> (Self, MockSerialHandle) {
        let (to_device, rx) = mpsc::unbounded_channel();
        let (tx, from_device) = mpsc::unbounded_channel();

        let link = Self {
            rx,
            tx,
            name: name.clone(),
        };

        let handle = MockSerialHandle {
            to_device,
            from_device,
            pending: Vec::new(),
            name,
        };

        (link, handle)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SerialLink for MockSerial {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        match self.rx.try_recv() {
            Ok(byte) => Ok(Some(byte)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(HardwareError::disconnected(&self.name)),
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.tx
            .send(byte)
            .map_err(|_| HardwareError::disconnected(&self.name))
    }
}

/// Handle for driving a mock serial link.
#[derive(Debug)]
pub struct MockSerialHandle {
    /// Channel sender towards the device
    to_device: mpsc::UnboundedSender<u8>,

    /// Channel receiver for transmitted bytes
    from_device: mpsc::UnboundedReceiver<u8>,

    /// Transmitted bytes not yet forming a complete line
    pending: Vec<u8>,

    /// Device name
    name: String,
}

impl MockSerialHandle {
    /// Queue raw bytes for the device to receive.
    ///
    /// # Errors
    ///
    /// Returns an error if the device side has been dropped.
    pub fn send(&self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.to_device
                .send(byte)
                .map_err(|_| HardwareError::disconnected(&self.name))?;
        }
        Ok(())
    }

    /// Queue a scanned code followed by a carriage return.
    ///
    /// # Errors
    ///
    /// Returns an error if the device side has been dropped.
    pub fn send_code(&self, code: &str) -> Result<()> {
        self.send(code.as_bytes())?;
        self.send(&[CARRIAGE_RETURN])
    }

    /// Drain every byte transmitted so far, including any partial line.
    pub fn take_output(&mut self) -> Vec<u8> {
        let mut output = std::mem::take(&mut self.pending);
        while let Ok(byte) = self.from_device.try_recv() {
            output.push(byte);
        }
        output
    }

    /// Drain complete CRLF-terminated lines, without their terminator.
    ///
    /// A trailing partial line stays buffered for the next call.
    pub fn take_lines(&mut self) -> Vec<String> {
        while let Ok(byte) = self.from_device.try_recv() {
            self.pending.push(byte);
        }

        let mut lines = Vec::new();
        while let Some(end) = self
            .pending
            .windows(LINE_TERMINATOR.len())
            .position(|w| w == LINE_TERMINATOR)
        {
            let rest = self.pending.split_off(end + LINE_TERMINATOR.len());
            let line = std::mem::replace(&mut self.pending, rest);
            lines.push(String::from_utf8_lossy(&line[..end]).into_owned());
        }
        lines
    }

    /// Wait for the next transmitted byte.
    ///
    /// Returns `None` once the device side has been dropped and every byte has
    /// been read.
    pub async fn recv_byte(&mut self) -> Option<u8> {
        self.from_device.recv().await
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

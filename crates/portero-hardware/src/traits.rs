//! Peripheral trait definitions.
//!
//! These traits are the boundary between the firmware core and the
//! microcontroller peripherals: the UART shared by the scanner and the report,
//! the data EEPROM holding the credential roster, the two indicator outputs
//! and a blocking millisecond delay.
//!
//! All methods are synchronous. The firmware runs a single non-suspending
//! polling loop, so every call either returns immediately (`poll_byte`) or
//! spins for a hardware-bounded time (`write_byte`, `wait_write_complete`,
//! `delay_ms`). None of them applies a software timeout.

use crate::critical::CriticalSection;
use crate::error::Result;
use crate::types::Indicator;

/// Full-duplex serial link.
///
/// # Examples
///
/// ```
/// use portero_hardware::traits::SerialLink;
/// use portero_hardware::mock::MockSerial;
///
/// let (mut link, handle) = MockSerial::new();
/// assert_eq!(link.poll_byte().unwrap(), None);
///
/// handle.send(b"A").unwrap();
/// assert_eq!(link.poll_byte().unwrap(), Some(b'A'));
/// ```
pub trait SerialLink {
    /// Return the next received byte, or `None` if nothing is pending.
    ///
    /// Never blocks.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device is gone.
    fn poll_byte(&mut self) -> Result<Option<u8>>;

    /// Transmit one byte, spinning until the transmit buffer is free.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying device is gone.
    fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Transmit every byte of `bytes` in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failed byte.
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

/// Byte-addressable non-volatile memory.
///
/// A write is split in two: the unlock-and-start sequence, which must run with
/// interrupts masked (hence the [`CriticalSection`] token), and the wait for
/// the cell to be programmed, which must not.
pub trait NonVolatileMemory {
    /// Read one byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is outside the device or the cell
    /// cannot be read.
    fn read(&mut self, address: u8) -> Result<u8>;

    /// Run the unlock sequence and start programming `value` at `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if another write is still in progress or the address
    /// is outside the device.
    fn begin_write(&mut self, cs: &CriticalSection<'_>, address: u8, value: u8) -> Result<()>;

    /// Spin until the write started by [`begin_write`](Self::begin_write)
    /// has completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the device reports a programming failure.
    fn wait_write_complete(&mut self) -> Result<()>;
}

/// The two decision indicator outputs.
pub trait IndicatorOutput {
    /// Drive `indicator` high (`lit = true`) or low.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be driven.
    fn set(&mut self, indicator: Indicator, lit: bool) -> Result<()>;
}

/// Blocking delay.
pub trait DelayMs {
    /// Spin for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

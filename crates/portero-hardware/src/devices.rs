//! Enum wrapper for serial link dispatch.
//!
//! The firmware is generic over its peripherals. When the concrete link is
//! only known at run time (mock channel or real port, selected by a flag),
//! [`AnySerialLink`] gives a single concrete type with static dispatch to
//! each variant. Variants for real hardware exist only with their feature.
//!
//! # Examples
//!
//! ```
//! use portero_hardware::devices::AnySerialLink;
//! use portero_hardware::mock::MockSerial;
//! use portero_hardware::traits::SerialLink;
//!
//! let (link, handle) = MockSerial::new();
//! let mut any_link = AnySerialLink::Mock(link);
//!
//! handle.send(b"7").unwrap();
//! assert_eq!(any_link.poll_byte().unwrap(), Some(b'7'));
//! ```

use crate::Result;
use crate::mock::MockSerial;
#[cfg(feature = "hardware-serial")]
use crate::port::PortSerial;
use crate::traits::SerialLink;

/// Enum wrapper for serial link dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySerialLink {
    /// Channel-backed link for development and testing.
    Mock(MockSerial),

    /// Host serial port.
    #[cfg(feature = "hardware-serial")]
    Port(PortSerial),
}

impl SerialLink for AnySerialLink {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        match self {
            Self::Mock(link) => link.poll_byte(),
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.poll_byte(),
        }
    }

    fn write_byte(&mut self, byte: u8) -> Result<()> {
        match self {
            Self::Mock(link) => link.write_byte(byte),
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.write_byte(byte),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        match self {
            Self::Mock(link) => link.write_all(bytes),
            #[cfg(feature = "hardware-serial")]
            Self::Port(link) => link.write_all(bytes),
        }
    }
}

impl From<MockSerial> for AnySerialLink {
    fn from(link: MockSerial) -> Self {
        Self::Mock(link)
    }
}

#[cfg(feature = "hardware-serial")]
impl From<PortSerial> for AnySerialLink {
    fn from(link: PortSerial) -> Self {
        Self::Port(link)
    }
}

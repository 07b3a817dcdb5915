//! Error types for hardware operations.
//!
//! The target hardware never reports failures for the operations used here;
//! these variants exist for host devices (mock channels, real serial ports,
//! file-backed EEPROM) whose I/O can fail.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Serial link communication error.
    #[error("Communication error: {message}")]
    CommunicationError { message: String },

    /// Non-volatile memory access failed.
    #[error("Storage error at address {address:#04x}: {message}")]
    Storage { address: u8, message: String },

    /// Invalid data received from or passed to a device.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    /// Create a new storage error.
    pub fn storage(address: u8, message: impl Into<String>) -> Self {
        Self::Storage {
            address,
            message: message.into(),
        }
    }

    /// Create a new invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }
}

#[cfg(feature = "hardware-serial")]
impl From<serialport::Error> for HardwareError {
    fn from(e: serialport::Error) -> Self {
        Self::communication(e.to_string())
    }
}

use portero_hardware::HardwareError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error(transparent)]
    Core(#[from] portero_core::Error),

    #[error("Credential slot {slot} out of range (0-{max})")]
    SlotOutOfRange { slot: usize, max: usize },

    #[error("Verification failed at {address:#04x}: wrote {expected:#04x}, read {actual:#04x}")]
    VerificationFailed { address: u8, expected: u8, actual: u8 },
}

pub type Result<T> = std::result::Result<T, Error>;

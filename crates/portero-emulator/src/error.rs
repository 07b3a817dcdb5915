use portero_hardware::HardwareError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error(transparent)]
    Firmware(#[from] portero_firmware::Error),

    #[error(transparent)]
    Hardware(#[from] HardwareError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dispatcher task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Time scale must be a positive finite number, got {0}")]
    InvalidTimeScale(f64),
}

pub type Result<T> = std::result::Result<T, EmulatorError>;

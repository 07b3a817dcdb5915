//! Host emulator for the portero access-control endpoint.
//!
//! Runs the unmodified firmware core against host devices: stdin/stdout or a
//! real serial port as the UART, a file as the data EEPROM, log lines as the
//! lamps, and a tokio interval task as the timer interrupt.
//!
//! ```no_run
//! use portero_emulator::{Emulator, FileEeprom};
//! use portero_firmware::FirmwareConfig;
//! use portero_hardware::mock::MockSerial;
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//!
//! # async fn example() -> portero_emulator::Result<()> {
//! let (link, handle) = MockSerial::new();
//! let storage = FileEeprom::open("portero-eeprom.bin")?;
//! let shutdown = Arc::new(AtomicBool::new(false));
//!
//! Emulator::new(FirmwareConfig::default(), 1.0)?
//!     .run(link.into(), storage, shutdown)
//!     .await?;
//! # drop(handle);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod eeprom;
pub mod error;
pub mod host;
pub mod runtime;

pub use cli::Args;
pub use eeprom::FileEeprom;
pub use error::{EmulatorError, Result};
pub use host::{HostDelay, HostIndicators};
pub use runtime::{Emulator, pump, spawn_stdin_reader, spawn_ticker};

//! Firmware core of the portero access-control endpoint.
//!
//! A barcode scanner writes identifiers into the UART. Each complete read is
//! checked against five credentials held in EEPROM, signalled on a green or
//! red lamp, and buffered. The buffer is reported back over the same UART
//! every five minutes, or earlier once five attempts have piled up.
//!
//! # Components
//!
//! - [`Clock`]: seconds counter advanced by the timer interrupt
//! - [`CredentialStore`]: five EEPROM slots, provisioned once
//! - [`IdentifierReader`]: byte-at-a-time acquisition of 8-character codes
//! - [`EventLog`]: fixed buffer of access events and the flush policy
//! - [`Dispatcher`]: the main polling loop tying them together
//!
//! # Example
//!
//! ```
//! use portero_firmware::{Clock, Dispatcher, FirmwareConfig, Peripherals};
//! use portero_hardware::mock::{
//!     MockDelay, MockEeprom, MockIndicators, MockInterrupts, MockSerial,
//! };
//!
//! # fn main() -> portero_firmware::Result<()> {
//! let config = FirmwareConfig::default();
//! let clock = Clock::new(config.ticks_per_second);
//! let (link, mut handle) = MockSerial::new();
//!
//! let mut dispatcher = Dispatcher::new(
//!     &clock,
//!     Peripherals {
//!         link,
//!         storage: MockEeprom::new(),
//!         indicators: MockIndicators::new(),
//!         delay: MockDelay::new(),
//!         interrupts: MockInterrupts::new(),
//!     },
//!     &config,
//! )?;
//! dispatcher.start()?;
//!
//! handle.send_code("49432642")?;
//! let mut granted = false;
//! for _ in 0..9 {
//!     if let Some(attempt) = dispatcher.step()?.attempt {
//!         granted = attempt.authorized;
//!     }
//! }
//! assert!(granted);
//! assert!(handle.take_lines().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod config;
pub mod credentials;
pub mod dispatcher;
pub mod error;
pub mod event_log;
pub mod reader;

pub use clock::Clock;
pub use config::FirmwareConfig;
pub use credentials::{CredentialStore, Provisioning};
pub use dispatcher::{AccessAttempt, Dispatcher, Peripherals, Step};
pub use error::{Error, Result};
pub use event_log::{EventLog, FlushOutcome};
pub use reader::{IdentifierReader, ReadResult, ReaderState};

/// Firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Peripheral abstraction layer for the portero access-control endpoint.
//!
//! The firmware core talks to its microcontroller only through the traits in
//! this crate, so the same dispatcher runs on the target, in unit tests
//! against mocks, and in the host emulator.
//!
//! # Peripherals
//!
//! - [`SerialLink`]: the UART. The barcode scanner writes codes into it and the
//!   buffered access report goes out through it.
//! - [`NonVolatileMemory`]: the data EEPROM holding five credential slots.
//! - [`IndicatorOutput`]: the green and red lamps.
//! - [`DelayMs`]: a busy-wait used for the lamp pulse.
//! - [`InterruptControl`]: the global interrupt enable, yielding a
//!   [`CriticalSection`] token.
//!
//! ```no_run
//! use portero_hardware::traits::SerialLink;
//! use portero_hardware::Result;
//!
//! fn drain<L: SerialLink>(link: &mut L) -> Result<usize> {
//!     let mut count = 0;
//!     while link.poll_byte()?.is_some() {
//!         count += 1;
//!     }
//!     Ok(count)
//! }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`][error::Result] with
//! [`HardwareError`]. On the target these operations do not fail; host devices
//! surface disconnections and I/O failures through it.
//!
//! [`SerialLink`]: traits::SerialLink
//! [`NonVolatileMemory`]: traits::NonVolatileMemory
//! [`IndicatorOutput`]: traits::IndicatorOutput
//! [`DelayMs`]: traits::DelayMs
//! [`InterruptControl`]: critical::InterruptControl
//! [`CriticalSection`]: critical::CriticalSection

pub mod critical;
pub mod devices;
pub mod error;
pub mod mock;
#[cfg(feature = "hardware-serial")]
pub mod port;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use critical::{CriticalSection, InterruptControl};
pub use devices::AnySerialLink;
pub use error::{HardwareError, Result};
pub use traits::{DelayMs, IndicatorOutput, NonVolatileMemory, SerialLink};
pub use types::Indicator;

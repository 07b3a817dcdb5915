//! Mock device implementations for testing and development.
//!
//! This module provides simulated peripherals that can be controlled
//! programmatically without requiring the target board.

pub mod eeprom;
pub mod indicators;
pub mod interrupts;
pub mod serial;

// Re-export commonly used types
pub use eeprom::MockEeprom;
pub use indicators::{MockDelay, MockIndicators};
pub use interrupts::MockInterrupts;
pub use serial::{MockSerial, MockSerialHandle};

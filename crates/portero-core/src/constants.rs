//! Fixed parameters of the access-control endpoint.
//!
//! Everything the firmware sizes statically lives here: buffer capacities,
//! non-volatile layout, timer calibration and the literals of the outbound
//! serial report.
//!
//! # Report Format
//!
//! ```text
//! tiempo=0007, cedula=49432642, autorizado=Si<CR><LF>
//! No ocurrieron eventos en 5 minutos.<CR><LF>
//! ```
//!
//! # Usage
//!
//! ```
//! use portero_core::constants::*;
//!
//! assert_eq!(CREDENTIAL_SLOTS * CREDENTIAL_SLOT_STRIDE, 40);
//! assert_eq!(DEFAULT_FLUSH_INTERVAL_SECS / 60, 5);
//! ```

// ============================================================================
// Identifier Acquisition
// ============================================================================

/// Exact number of characters a scanned identifier must have.
pub const IDENTIFIER_LENGTH: usize = 8;

/// Capacity of the in-progress acquisition buffer.
///
/// The reader never fills it past `IDENTIFIER_LENGTH + 1` bytes; the slack is
/// what the scanner firmware was sized for.
pub const READ_BUFFER_CAPACITY: usize = 20;

/// Carriage return, one of the two code terminators.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// Line feed, one of the two code terminators.
pub const LINE_FEED: u8 = b'\n';

/// Byte the UART poll yields when nothing was received.
pub const NO_DATA: u8 = 0x00;

/// Marker written over the eighth character of a malformed read.
///
/// Makes a wrong-length read stand out in the transmitted report.
///
/// # Examples
///
/// ```
/// use portero_core::constants::{INVALID_MARKER, INVALID_MARKER_POSITION};
///
/// let mut code = *b"1234567?";
/// code[INVALID_MARKER_POSITION] = INVALID_MARKER;
/// assert_eq!(&code, b"1234567@");
/// ```
pub const INVALID_MARKER: u8 = b'@';

/// Zero-based index of the invalid marker.
pub const INVALID_MARKER_POSITION: usize = IDENTIFIER_LENGTH - 1;

// ============================================================================
// Credential Storage
// ============================================================================

/// Number of credential slots in non-volatile memory.
pub const CREDENTIAL_SLOTS: usize = 5;

/// Distance in bytes between consecutive slots.
pub const CREDENTIAL_SLOT_STRIDE: usize = 8;

/// Address of the first slot.
pub const CREDENTIAL_BASE_ADDRESS: u8 = 0x00;

/// Address inspected to decide whether storage is blank.
pub const PROVISIONING_SENTINEL_ADDRESS: u8 = CREDENTIAL_BASE_ADDRESS;

/// Value an erased EEPROM cell reads as (all bits set).
pub const ERASED_BYTE: u8 = 0xFF;

/// Size of the data EEPROM on the target part.
pub const EEPROM_SIZE: usize = 256;

/// Roster written on first boot when storage is blank, slot 1 first.
pub const DEFAULT_ROSTER: [[u8; IDENTIFIER_LENGTH]; CREDENTIAL_SLOTS] = [
    *b"49432642",
    *b"55787807",
    *b"50329945",
    *b"49852969",
    *b"49374418",
];

// ============================================================================
// Event Buffering
// ============================================================================

/// Maximum number of access events held between flushes.
pub const EVENT_LOG_CAPACITY: usize = 5;

/// Seconds between periodic flushes (5 minutes).
pub const DEFAULT_FLUSH_INTERVAL_SECS: u16 = 300;

// ============================================================================
// Time Keeping
// ============================================================================

/// Timer overflows per second.
///
/// 8 MHz crystal, Fosc/4, 1:32 prescaler and an 8-bit counter give one
/// overflow every 4.096 ms; 244 of them are 0.999 s.
pub const DEFAULT_TICKS_PER_SECOND: u8 = 244;

/// Period of one timer overflow in microseconds.
pub const TICK_PERIOD_MICROS: u64 = 4096;

// ============================================================================
// Indicators
// ============================================================================

/// How long an indicator stays lit after a decision (milliseconds).
pub const DEFAULT_INDICATOR_PULSE_MS: u32 = 500;

// ============================================================================
// Serial Report
// ============================================================================

/// Serial link baud rate.
pub const BAUD_RATE: u32 = 9600;

/// Terminator appended to every report line.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Minimum width of the zero-padded timestamp field.
pub const TIMESTAMP_WIDTH: usize = 4;

/// Key of the timestamp field.
pub const FIELD_TIMESTAMP: &str = "tiempo";

/// Key of the identifier field.
pub const FIELD_IDENTIFIER: &str = "cedula";

/// Key of the authorization field.
pub const FIELD_AUTHORIZED: &str = "autorizado";

/// Separator between report fields.
pub const FIELD_SEPARATOR: &str = ", ";

/// Value of the authorization field when access was granted.
pub const AUTHORIZED_YES: &str = "Si";

/// Value of the authorization field when access was denied.
pub const AUTHORIZED_NO: &str = "No";

/// Leading text of the idle notification.
pub const NO_EVENTS_PREFIX: &str = "No ocurrieron eventos en ";

/// Trailing text of the idle notification.
pub const NO_EVENTS_SUFFIX: &str = " minutos.";

//! Identifier acquisition state machine.
//!
//! Bytes from the scanner accumulate until a carriage return or line feed.
//! Exactly eight bytes before the terminator form a candidate identifier;
//! any other length is a malformed read.
//!
//! # States
//!
//! - `Empty`: nothing buffered
//! - `Filling`: 1 to 8 bytes buffered
//! - `Overflowing`: a ninth byte arrived; further bytes are dropped until the
//!   terminator and the read is already known to be malformed
//!
//! # Malformed reads
//!
//! The logged text keeps at most eight buffered bytes. When the read reached
//! at least seven bytes, the eighth position is overwritten with `@`, so a
//! 7-byte read logs as `1234567@` and a 12-byte read as the first seven bytes
//! plus `@`. Shorter reads are logged as received.
//!
//! ```
//! use portero_firmware::reader::{IdentifierReader, ReadResult};
//!
//! let mut reader = IdentifierReader::new();
//! let mut result = None;
//! for &byte in b"1234567\r" {
//!     result = reader.feed(byte);
//! }
//! match result {
//!     Some(ReadResult::Malformed(code)) => assert_eq!(code.as_bytes(), b"1234567@"),
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use portero_core::{
    Identifier, RawCode,
    constants::{
        CARRIAGE_RETURN, IDENTIFIER_LENGTH, INVALID_MARKER, INVALID_MARKER_POSITION, LINE_FEED,
        NO_DATA, READ_BUFFER_CAPACITY,
    },
};
use std::fmt;
use tracing::{debug, trace};

/// Outcome of a terminated read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadResult {
    /// Exactly eight bytes; to be checked against the credential store.
    Candidate(Identifier),
    /// Wrong length; logged as unauthorized.
    Malformed(RawCode),
}

/// Acquisition phase, derived from the fill index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Empty,
    Filling,
    Overflowing,
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            ReaderState::Empty => "Empty",
            ReaderState::Filling => "Filling",
            ReaderState::Overflowing => "Overflowing",
        };
        write!(f, "{}", state_str)
    }
}

#[derive(Debug, Clone)]
pub struct IdentifierReader {
    buffer: [u8; READ_BUFFER_CAPACITY],
    index: usize,
}

impl IdentifierReader {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [0; READ_BUFFER_CAPACITY],
            index: 0,
        }
    }

    /// Consume one received byte.
    ///
    /// Returns a result only when `byte` is a terminator.
    pub fn feed(&mut self, byte: u8) -> Option<ReadResult> {
        match byte {
            NO_DATA => None,
            CARRIAGE_RETURN | LINE_FEED => Some(self.complete()),
            _ => {
                // Accepting index 8 lets a ninth byte in, which is what moves a
                // too-long read into the malformed branch.
                if self.index <= IDENTIFIER_LENGTH {
                    self.buffer[self.index] = byte;
                    self.index += 1;
                } else {
                    trace!("Dropping byte {:#04x} past identifier length", byte);
                }
                None
            }
        }
    }

    fn complete(&mut self) -> ReadResult {
        let len = self.index;
        self.index = 0;

        if len == IDENTIFIER_LENGTH {
            let mut id = [0u8; IDENTIFIER_LENGTH];
            id.copy_from_slice(&self.buffer[..IDENTIFIER_LENGTH]);
            return ReadResult::Candidate(Identifier::from_bytes(id));
        }

        let kept = if len >= INVALID_MARKER_POSITION {
            self.buffer[INVALID_MARKER_POSITION] = INVALID_MARKER;
            IDENTIFIER_LENGTH
        } else {
            len
        };
        let code = RawCode::truncated(&self.buffer[..kept]);
        debug!("Malformed read of {} bytes logged as '{}'", len, code);
        ReadResult::Malformed(code)
    }

    /// Discard any partially buffered read.
    pub fn reset(&mut self) {
        self.index = 0;
    }

    /// Bytes buffered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn state(&self) -> ReaderState {
        match self.index {
            0 => ReaderState::Empty,
            i if i <= IDENTIFIER_LENGTH => ReaderState::Filling,
            _ => ReaderState::Overflowing,
        }
    }
}

impl Default for IdentifierReader {
    fn default() -> Self {
        Self::new()
    }
}

//! Outbound serial report lines.
//!
//! The endpoint emits two kinds of line over its serial link, each terminated
//! by CRLF:
//!
//! ```text
//! tiempo=0042, cedula=55787807, autorizado=Si
//! No ocurrieron eventos en 5 minutos.
//! ```
//!
//! [`ReportLine::encode`] produces the exact wire bytes through a byte sink so
//! the firmware never allocates. The host side parses lines back with
//! [`str::parse`].
//!
//! # Examples
//!
//! ```
//! use portero_core::{AccessEvent, ReportLine};
//!
//! let line = ReportLine::Event(AccessEvent::new(7, "12345678".parse()?, false));
//!
//! let mut wire = Vec::new();
//! line.encode(|chunk| {
//!     wire.extend_from_slice(chunk);
//!     Ok::<_, ()>(())
//! })
//! .unwrap();
//! assert_eq!(wire, b"tiempo=0007, cedula=12345678, autorizado=No\r\n");
//!
//! let parsed: ReportLine = "tiempo=0007, cedula=12345678, autorizado=No\r\n".parse()?;
//! assert_eq!(parsed, line);
//! # Ok::<(), portero_core::Error>(())
//! ```

use crate::{
    Result,
    constants::{
        AUTHORIZED_NO, AUTHORIZED_YES, FIELD_AUTHORIZED, FIELD_IDENTIFIER, FIELD_SEPARATOR,
        FIELD_TIMESTAMP, LINE_TERMINATOR, NO_EVENTS_PREFIX, NO_EVENTS_SUFFIX, TIMESTAMP_WIDTH,
    },
    error::Error,
    types::{AccessEvent, RawCode},
};
use std::fmt::{self, Write as _};

/// One line of the outbound report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine {
    /// A buffered access attempt.
    Event(AccessEvent),

    /// Nothing happened during a whole flush interval.
    NoEvents {
        /// Length of the interval in minutes.
        minutes: u16,
    },
}

impl ReportLine {
    /// Feed the line body (without terminator) to `sink`, chunk by chunk.
    ///
    /// # Errors
    /// Propagates the first error returned by `sink`.
    pub fn encode_body<E>(
        &self,
        mut sink: impl FnMut(&[u8]) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        // A u16 never needs more than five digits.
        let mut digits: heapless::String<5> = heapless::String::new();

        match self {
            Self::Event(event) => {
                let _ = write!(digits, "{:0width$}", event.timestamp, width = TIMESTAMP_WIDTH);
                let flag = if event.authorized {
                    AUTHORIZED_YES
                } else {
                    AUTHORIZED_NO
                };

                sink(FIELD_TIMESTAMP.as_bytes())?;
                sink(b"=")?;
                sink(digits.as_bytes())?;
                sink(FIELD_SEPARATOR.as_bytes())?;
                sink(FIELD_IDENTIFIER.as_bytes())?;
                sink(b"=")?;
                sink(event.code.as_bytes())?;
                sink(FIELD_SEPARATOR.as_bytes())?;
                sink(FIELD_AUTHORIZED.as_bytes())?;
                sink(b"=")?;
                sink(flag.as_bytes())
            }
            Self::NoEvents { minutes } => {
                let _ = write!(digits, "{minutes}");
                sink(NO_EVENTS_PREFIX.as_bytes())?;
                sink(digits.as_bytes())?;
                sink(NO_EVENTS_SUFFIX.as_bytes())
            }
        }
    }

    /// Feed the complete wire form, CRLF included, to `sink`.
    ///
    /// # Errors
    /// Propagates the first error returned by `sink`.
    pub fn encode<E>(
        &self,
        mut sink: impl FnMut(&[u8]) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        self.encode_body(&mut sink)?;
        sink(LINE_TERMINATOR)
    }

    /// Wire form collected into a vector.
    #[must_use]
    pub fn to_wire(&self) -> Vec<u8> {
        let mut wire = Vec::new();
        let _ = self.encode(|chunk| {
            wire.extend_from_slice(chunk);
            Ok::<_, ()>(())
        });
        wire
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.encode_body(|chunk| {
            for &byte in chunk {
                let ch = if byte.is_ascii() {
                    char::from(byte)
                } else {
                    char::REPLACEMENT_CHARACTER
                };
                f.write_char(ch)?;
            }
            Ok(())
        })
    }
}

fn field<'a>(part: &'a str, key: &str) -> Result<&'a str> {
    part.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix('='))
        .ok_or_else(|| Error::invalid_report_line(format!("Expected field '{key}', got '{part}'")))
}

fn parse_event(line: &str) -> Result<AccessEvent> {
    let missing_field =
        || Error::invalid_report_line(format!("Event line needs 3 fields: '{line}'"));
    let (timestamp, rest) = line.split_once(FIELD_SEPARATOR).ok_or_else(missing_field)?;
    // Raw codes may contain the separator themselves; the flag never does.
    let (code, flag) = rest.rsplit_once(FIELD_SEPARATOR).ok_or_else(missing_field)?;

    let timestamp = field(timestamp, FIELD_TIMESTAMP)?;
    if timestamp.is_empty() || !timestamp.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_report_line(format!(
            "Timestamp must be decimal digits, got '{timestamp}'"
        )));
    }
    let timestamp: u16 = timestamp.parse().map_err(|_| {
        Error::invalid_report_line(format!("Timestamp out of range: '{timestamp}'"))
    })?;

    let code: RawCode = field(code, FIELD_IDENTIFIER)?
        .parse()
        .map_err(|e: Error| Error::invalid_report_line(e.to_string()))?;

    let authorized = match field(flag, FIELD_AUTHORIZED)? {
        AUTHORIZED_YES => true,
        AUTHORIZED_NO => false,
        other => {
            return Err(Error::invalid_report_line(format!(
                "Authorization flag must be '{AUTHORIZED_YES}' or '{AUTHORIZED_NO}', got '{other}'"
            )));
        }
    };

    Ok(AccessEvent::new(timestamp, code, authorized))
}

impl std::str::FromStr for ReportLine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim_end_matches(['\r', '\n']);

        if let Some(rest) = line.strip_prefix(NO_EVENTS_PREFIX) {
            let minutes = rest
                .strip_suffix(NO_EVENTS_SUFFIX)
                .and_then(|m| m.parse().ok())
                .ok_or_else(|| Error::invalid_report_line(format!("Malformed idle line: '{line}'")))?;
            return Ok(Self::NoEvents { minutes });
        }

        if line.starts_with(FIELD_TIMESTAMP) {
            return parse_event(line).map(Self::Event);
        }

        Err(Error::invalid_report_line(format!(
            "Unrecognized report line: '{line}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn event(timestamp: u16, code: &str, authorized: bool) -> ReportLine {
        ReportLine::Event(AccessEvent::new(timestamp, code.parse().unwrap(), authorized))
    }

    #[rstest]
    #[case(0, "tiempo=0000")]
    #[case(7, "tiempo=0007")]
    #[case(299, "tiempo=0299")]
    #[case(9999, "tiempo=9999")]
    #[case(12345, "tiempo=12345")]
    fn test_timestamp_zero_padding(#[case] timestamp: u16, #[case] prefix: &str) {
        let line = event(timestamp, "12345678", true).to_string();
        assert!(line.starts_with(prefix), "{line}");
    }

    #[test]
    fn test_event_wire_format() {
        assert_eq!(
            event(42, "55787807", true).to_wire(),
            b"tiempo=0042, cedula=55787807, autorizado=Si\r\n"
        );
        assert_eq!(
            event(3, "1234567@", false).to_wire(),
            b"tiempo=0003, cedula=1234567@, autorizado=No\r\n"
        );
    }

    #[test]
    fn test_no_events_wire_format() {
        assert_eq!(
            ReportLine::NoEvents { minutes: 5 }.to_wire(),
            b"No ocurrieron eventos en 5 minutos.\r\n"
        );
    }

    #[test]
    fn test_raw_bytes_reach_the_wire_unchanged() {
        let code = RawCode::from_slice(&[b'1', 0xE9]).unwrap();
        let wire = ReportLine::Event(AccessEvent::new(1, code, false)).to_wire();
        assert_eq!(&wire[20..22], &[b'1', 0xE9]);
    }

    #[test]
    fn test_sink_error_stops_encoding() {
        let mut calls = 0;
        let result = event(1, "12345678", true).encode(|_| {
            calls += 1;
            if calls == 2 { Err("link down") } else { Ok(()) }
        });
        assert_eq!(result, Err("link down"));
        assert_eq!(calls, 2);
    }

    #[rstest]
    #[case("tiempo=0007, cedula=12345678, autorizado=Si", 7, "12345678", true)]
    #[case("tiempo=0000, cedula=1234567@, autorizado=No\r\n", 0, "1234567@", false)]
    #[case("tiempo=0120, cedula=, autorizado=No\n", 120, "", false)]
    #[case("tiempo=0003, cedula=ab, cd, autorizado=No", 3, "ab, cd", false)]
    #[case("tiempo=0004, cedula=, , , autorizado=No", 4, ", , ", false)]
    fn test_parse_event_line(
        #[case] input: &str,
        #[case] timestamp: u16,
        #[case] code: &str,
        #[case] authorized: bool,
    ) {
        assert_eq!(input.parse::<ReportLine>().unwrap(), event(timestamp, code, authorized));
    }

    #[test]
    fn test_separator_inside_code_round_trips() {
        let line = ReportLine::Event(AccessEvent::new(
            3,
            RawCode::from_slice(b"ab, cd").unwrap(),
            false,
        ));
        let wire = line.to_wire();
        assert_eq!(wire, b"tiempo=0003, cedula=ab, cd, autorizado=No\r\n");
        let text = std::str::from_utf8(&wire).unwrap();
        assert_eq!(text.parse::<ReportLine>().unwrap(), line);
    }

    #[test]
    fn test_parse_no_events_line() {
        let line: ReportLine = "No ocurrieron eventos en 5 minutos.\r\n".parse().unwrap();
        assert_eq!(line, ReportLine::NoEvents { minutes: 5 });
    }

    #[rstest]
    #[case("")]
    #[case("hola")]
    #[case("tiempo=00a7, cedula=12345678, autorizado=Si")]
    #[case("tiempo=0007, cedula=123456789, autorizado=Si")]
    #[case("tiempo=0007, cedula=12345678, autorizado=Yes")]
    #[case("tiempo=0007, codigo=12345678, autorizado=Si")]
    #[case("tiempo=0007, cedula=12345678")]
    #[case("tiempo=99999, cedula=12345678, autorizado=Si")]
    #[case("No ocurrieron eventos en cinco minutos.")]
    fn test_parse_rejects_malformed(#[case] input: &str) {
        assert!(matches!(
            input.parse::<ReportLine>(),
            Err(Error::InvalidReportLine { .. })
        ));
    }
}

use crate::{
    Result,
    constants::{IDENTIFIER_LENGTH, INVALID_MARKER, INVALID_MARKER_POSITION},
    error::Error,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt;

/// Renders raw scanner bytes, replacing anything outside ASCII.
fn write_bytes_lossy(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for &byte in bytes {
        let ch = if byte.is_ascii() {
            char::from(byte)
        } else {
            char::REPLACEMENT_CHARACTER
        };
        fmt::Write::write_char(f, ch)?;
    }
    Ok(())
}

/// ASCII codes serialize as text, anything else as the raw byte sequence.
fn serialize_code<S: Serializer>(
    bytes: &[u8],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    match std::str::from_utf8(bytes) {
        Ok(text) if text.is_ascii() => serializer.serialize_str(text),
        _ => serializer.collect_seq(bytes),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CodeRepr {
    Text(String),
    Bytes(Vec<u8>),
}

/// Well-formed identifier: exactly eight bytes as read from the scanner.
///
/// Comparison is positional and exact; no normalization is applied because the
/// credential slots hold the raw bytes the scanner produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identifier([u8; IDENTIFIER_LENGTH]);

impl Identifier {
    /// Wrap eight raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; IDENTIFIER_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Build an identifier from a slice of exactly eight bytes.
    ///
    /// # Errors
    /// Returns `Error::InvalidIdentifier` if the slice length is not eight.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let array: [u8; IDENTIFIER_LENGTH] = bytes.try_into().map_err(|_| {
            Error::invalid_identifier(format!(
                "Identifier must be {IDENTIFIER_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Raw bytes of the identifier.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LENGTH] {
        &self.0
    }

    /// Compare against a stored slot.
    ///
    /// Stops at the first differing position.
    #[must_use]
    pub fn matches(&self, stored: &[u8; IDENTIFIER_LENGTH]) -> bool {
        for (read, slot) in self.0.iter().zip(stored) {
            if read != slot {
                return false;
            }
        }
        true
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bytes_lossy(f, &self.0)
    }
}

impl std::str::FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if !s.is_ascii() {
            return Err(Error::invalid_identifier("Identifier must be ASCII"));
        }
        Self::from_slice(s.as_bytes())
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_code(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = match CodeRepr::deserialize(deserializer)? {
            CodeRepr::Text(text) => text.parse(),
            CodeRepr::Bytes(bytes) => Self::from_slice(&bytes),
        };
        id.map_err(de::Error::custom)
    }
}

/// Identifier text as it is kept in the event log.
///
/// Holds up to eight bytes. Well-formed reads store all eight; malformed reads
/// keep whatever the acquisition buffer retained, possibly carrying the
/// invalid marker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RawCode(heapless::Vec<u8, IDENTIFIER_LENGTH>);

impl RawCode {
    /// Copy up to eight bytes.
    ///
    /// # Errors
    /// Returns `Error::InvalidIdentifier` if more than eight bytes are given.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        heapless::Vec::from_slice(bytes).map(Self).map_err(|_| {
            Error::invalid_identifier(format!(
                "Logged code holds at most {IDENTIFIER_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })
    }

    /// Copy the first eight bytes at most, dropping the rest.
    #[must_use]
    pub fn truncated(bytes: &[u8]) -> Self {
        let kept = bytes.len().min(IDENTIFIER_LENGTH);
        Self(bytes[..kept].iter().copied().collect())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the eighth byte is the invalid marker.
    #[must_use]
    pub fn is_marked_invalid(&self) -> bool {
        self.0.get(INVALID_MARKER_POSITION) == Some(&INVALID_MARKER)
    }

    /// The code as a well-formed identifier, if it has exactly eight bytes.
    #[must_use]
    pub fn as_identifier(&self) -> Option<Identifier> {
        Identifier::from_slice(&self.0).ok()
    }
}

impl From<Identifier> for RawCode {
    fn from(id: Identifier) -> Self {
        Self(id.0.iter().copied().collect())
    }
}

impl fmt::Display for RawCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bytes_lossy(f, &self.0)
    }
}

impl std::str::FromStr for RawCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice(s.as_bytes())
    }
}

impl Serialize for RawCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serialize_code(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for RawCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let bytes = match CodeRepr::deserialize(deserializer)? {
            CodeRepr::Text(text) => text.into_bytes(),
            CodeRepr::Bytes(bytes) => bytes,
        };
        Self::from_slice(&bytes).map_err(de::Error::custom)
    }
}

/// One access attempt, as buffered between flushes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    /// Seconds elapsed since the last flush when the attempt was recorded.
    pub timestamp: u16,

    /// Identifier text that was presented.
    pub code: RawCode,

    /// Whether the identifier matched a provisioned credential.
    pub authorized: bool,
}

impl AccessEvent {
    #[must_use]
    pub fn new(timestamp: u16, code: RawCode, authorized: bool) -> Self {
        Self {
            timestamp,
            code,
            authorized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_identifier_from_str() {
        let id: Identifier = "49432642".parse().unwrap();
        assert_eq!(id.as_bytes(), b"49432642");
        assert_eq!(id.to_string(), "49432642");
    }

    #[rstest]
    #[case("")]
    #[case("1234567")]
    #[case("123456789")]
    #[case("1234567é")]
    fn test_identifier_rejects_wrong_shape(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Identifier>(),
            Err(Error::InvalidIdentifier { .. })
        ));
    }

    #[rstest]
    #[case(b"12345678", true)]
    #[case(b"02345678", false)]
    #[case(b"12345670", false)]
    #[case(b"12340678", false)]
    fn test_identifier_matches_every_position(#[case] stored: &[u8; 8], #[case] expected: bool) {
        let id = Identifier::from_bytes(*b"12345678");
        assert_eq!(id.matches(stored), expected);
    }

    #[test]
    fn test_raw_code_capacity() {
        assert!(RawCode::from_slice(b"").unwrap().is_empty());
        assert_eq!(RawCode::from_slice(b"12345678").unwrap().len(), 8);
        assert!(RawCode::from_slice(b"123456789").is_err());
        assert_eq!(RawCode::truncated(b"123456789").as_bytes(), b"12345678");
    }

    #[test]
    fn test_raw_code_marker_detection() {
        assert!(RawCode::from_slice(b"1234567@").unwrap().is_marked_invalid());
        assert!(!RawCode::from_slice(b"12345678").unwrap().is_marked_invalid());
        assert!(!RawCode::from_slice(b"123").unwrap().is_marked_invalid());
    }

    #[test]
    fn test_raw_code_from_identifier() {
        let id = Identifier::from_bytes(*b"55787807");
        let code = RawCode::from(id);
        assert_eq!(code.as_bytes(), b"55787807");
        assert_eq!(code.as_identifier(), Some(id));
    }

    #[test]
    fn test_non_ascii_bytes_render_as_replacement() {
        let code = RawCode::from_slice(&[b'1', 0xE9]).unwrap();
        assert_eq!(code.to_string(), "1\u{FFFD}");
    }

    #[test]
    fn test_access_event_serde() {
        let event = AccessEvent::new(7, "12345678".parse().unwrap(), true);
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"timestamp":7,"code":"12345678","authorized":true}"#
        );
        let back: AccessEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_non_ascii_codes_survive_serde() {
        let code = RawCode::from_slice(&[0xE9; 8]).unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "[233,233,233,233,233,233,233,233]");
        assert_eq!(serde_json::from_str::<RawCode>(&json).unwrap(), code);

        let id = Identifier::from_bytes([b'1', b'2', b'3', b'4', b'5', b'6', b'7', 0xFF]);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(serde_json::from_str::<Identifier>(&json).unwrap(), id);
    }

    #[test]
    fn test_identifier_deserialize_rejects_wrong_length() {
        assert!(serde_json::from_str::<Identifier>(r#""1234567""#).is_err());
        assert!(serde_json::from_str::<Identifier>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<RawCode>(r#""123456789""#).is_err());
    }
}

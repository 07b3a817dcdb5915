//! Firmware configuration.
//!
//! On the target every value is compiled in through [`FirmwareConfig::default`].
//! The host emulator can override them from a JSON file:
//!
//! ```json
//! {
//!   "flush_interval_secs": 60,
//!   "roster": ["49432642", "55787807", "50329945", "49852969", "12345678"]
//! }
//! ```
//!
//! Missing fields keep their defaults; unknown fields are rejected.

use crate::Result;
use portero_core::{
    Identifier,
    constants::{
        CREDENTIAL_SLOTS, DEFAULT_FLUSH_INTERVAL_SECS, DEFAULT_INDICATOR_PULSE_MS,
        DEFAULT_ROSTER, DEFAULT_TICKS_PER_SECOND,
    },
};
use serde::{Deserialize, Serialize};

/// Tunable parameters of the dispatcher and its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FirmwareConfig {
    /// Timer interrupts per counted second.
    pub ticks_per_second: u8,

    /// Seconds between periodic report flushes. Must be whole minutes.
    pub flush_interval_secs: u16,

    /// Indicator pulse length in milliseconds.
    pub indicator_pulse_ms: u32,

    /// Identifiers written on first boot, slot 1 first.
    pub roster: [Identifier; CREDENTIAL_SLOTS],

    /// Read every provisioning write back and fail on mismatch.
    pub verify_writes: bool,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            flush_interval_secs: DEFAULT_FLUSH_INTERVAL_SECS,
            indicator_pulse_ms: DEFAULT_INDICATOR_PULSE_MS,
            roster: DEFAULT_ROSTER.map(Identifier::from_bytes),
            verify_writes: false,
        }
    }
}

impl FirmwareConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns `Error::Core(Config)` if the JSON is malformed or a value is
    /// out of range.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| portero_core::Error::config(format!("Invalid configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// Returns `Error::Core(Config)` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_second == 0 {
            return Err(portero_core::Error::config("ticks_per_second must be at least 1").into());
        }
        if self.flush_interval_secs == 0 || self.flush_interval_secs % 60 != 0 {
            return Err(portero_core::Error::config(format!(
                "flush_interval_secs must be a positive whole number of minutes, got {}",
                self.flush_interval_secs
            ))
            .into());
        }
        Ok(())
    }

    /// Interval length as reported in the idle notification.
    #[must_use]
    pub fn flush_interval_minutes(&self) -> u16 {
        self.flush_interval_secs / 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_defaults_match_target_build() {
        let config = FirmwareConfig::default();
        assert_eq!(config.ticks_per_second, 244);
        assert_eq!(config.flush_interval_secs, 300);
        assert_eq!(config.flush_interval_minutes(), 5);
        assert_eq!(config.indicator_pulse_ms, 500);
        assert_eq!(config.roster[0].as_bytes(), b"49432642");
        assert_eq!(config.roster[4].as_bytes(), b"49374418");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = FirmwareConfig::from_json(r#"{"flush_interval_secs": 60}"#).unwrap();
        assert_eq!(config.flush_interval_secs, 60);
        assert_eq!(config.ticks_per_second, 244);
        assert_eq!(config.roster, FirmwareConfig::default().roster);
    }

    #[test]
    fn test_roster_from_json() {
        let config = FirmwareConfig::from_json(
            r#"{"roster": ["11111111", "22222222", "33333333", "44444444", "55555555"]}"#,
        )
        .unwrap();
        assert_eq!(config.roster[2].as_bytes(), b"33333333");
    }

    #[test]
    fn test_rejects_short_roster_entry() {
        let result = FirmwareConfig::from_json(
            r#"{"roster": ["1111111", "22222222", "33333333", "44444444", "55555555"]}"#,
        );
        assert!(matches!(
            result,
            Err(Error::Core(portero_core::Error::Config { .. }))
        ));
    }

    #[test]
    fn test_rejects_unknown_field() {
        assert!(FirmwareConfig::from_json(r#"{"baud": 115200}"#).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(FirmwareConfig::from_json(r#"{"ticks_per_second": 0}"#).is_err());
        assert!(FirmwareConfig::from_json(r#"{"flush_interval_secs": 0}"#).is_err());
        assert!(FirmwareConfig::from_json(r#"{"flush_interval_secs": 90}"#).is_err());
    }
}

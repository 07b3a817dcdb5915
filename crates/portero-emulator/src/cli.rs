//! Command-line arguments.

use crate::Result;
use clap::Parser;
#[cfg(feature = "hardware-serial")]
use portero_core::constants::BAUD_RATE;
use portero_firmware::FirmwareConfig;
use std::fs;
use std::path::PathBuf;

/// Run the portero firmware on the host.
///
/// Scanner input is read from stdin (one code per line) and the serial
/// report is written to stdout. Logs go to stderr; set `RUST_LOG` to tune.
#[derive(Debug, Parser)]
#[command(name = "portero-emulator", version, about)]
pub struct Args {
    /// JSON file overriding firmware defaults
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// EEPROM image; created erased if missing
    #[arg(long, value_name = "FILE", default_value = "portero-eeprom.bin")]
    pub eeprom: PathBuf,

    /// Serial device to use instead of stdin/stdout
    #[cfg(feature = "hardware-serial")]
    #[arg(long, value_name = "DEVICE")]
    pub port: Option<String>,

    /// Baud rate for --port
    #[cfg(feature = "hardware-serial")]
    #[arg(long, default_value_t = BAUD_RATE)]
    pub baud: u32,

    /// Speed-up factor for the timer and the lamp pulse
    #[arg(long, value_name = "FACTOR", default_value_t = 1.0)]
    pub time_scale: f64,
}

impl Args {
    /// Firmware configuration from `--config`, or the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load_config(&self) -> Result<FirmwareConfig> {
        match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)?;
                Ok(FirmwareConfig::from_json(&json)?)
            }
            None => Ok(FirmwareConfig::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EmulatorError;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["portero-emulator"]).unwrap();
        assert_eq!(args.eeprom, PathBuf::from("portero-eeprom.bin"));
        assert_eq!(args.time_scale, 1.0);
        assert_eq!(args.load_config().unwrap(), FirmwareConfig::default());
    }

    #[test]
    fn test_time_scale_flag() {
        let args = Args::try_parse_from(["portero-emulator", "--time-scale", "60"]).unwrap();
        assert_eq!(args.time_scale, 60.0);
    }

    #[test]
    fn test_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portero.json");
        fs::write(&path, r#"{"flush_interval_secs": 120, "indicator_pulse_ms": 50}"#).unwrap();

        let args = Args::try_parse_from([
            "portero-emulator",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let config = args.load_config().unwrap();
        assert_eq!(config.flush_interval_secs, 120);
        assert_eq!(config.indicator_pulse_ms, 50);
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portero.json");
        fs::write(&path, r#"{"flush_interval_secs": 45}"#).unwrap();

        let args = Args::try_parse_from(["portero-emulator", "--config", path.to_str().unwrap()])
            .unwrap();
        assert!(matches!(
            args.load_config(),
            Err(EmulatorError::Firmware(_))
        ));
    }

    #[test]
    fn test_missing_config_file() {
        let args =
            Args::try_parse_from(["portero-emulator", "--config", "/nonexistent/portero.json"])
                .unwrap();
        assert!(matches!(args.load_config(), Err(EmulatorError::Io(_))));
    }
}

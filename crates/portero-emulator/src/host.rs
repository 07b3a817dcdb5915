//! Host stand-ins for the lamps and the busy-wait delay.

use portero_hardware::{DelayMs, Indicator, IndicatorOutput, Result};
use std::thread;
use std::time::Duration;
use tracing::info;

/// Lamps rendered as log lines.
#[derive(Debug, Default)]
pub struct HostIndicators {
    authorized: bool,
    unauthorized: bool,
}

impl HostIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_lit(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::Authorized => self.authorized,
            Indicator::Unauthorized => self.unauthorized,
        }
    }
}

impl IndicatorOutput for HostIndicators {
    fn set(&mut self, indicator: Indicator, lit: bool) -> Result<()> {
        let level = match indicator {
            Indicator::Authorized => &mut self.authorized,
            Indicator::Unauthorized => &mut self.unauthorized,
        };
        if *level != lit {
            info!("{} lamp {}", indicator, if lit { "ON" } else { "off" });
        }
        *level = lit;
        Ok(())
    }
}

/// Delay that sleeps the dispatcher thread, shortened by the time scale.
#[derive(Debug, Clone, Copy)]
pub struct HostDelay {
    time_scale: f64,
}

impl HostDelay {
    pub fn new(time_scale: f64) -> Self {
        Self { time_scale }
    }

    /// Wall-clock length of a `ms` delay.
    pub fn scaled(&self, ms: u32) -> Duration {
        Duration::from_secs_f64(f64::from(ms) / 1000.0 / self.time_scale)
    }
}

impl DelayMs for HostDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(self.scaled(ms));
    }
}

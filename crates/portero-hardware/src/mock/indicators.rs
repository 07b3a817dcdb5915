//! Mock indicator outputs and delay.

use crate::{
    Result,
    traits::{DelayMs, IndicatorOutput},
    types::Indicator,
};
use tracing::debug;

/// Mock indicator pair that records every level change.
#[derive(Debug, Clone, Default)]
pub struct MockIndicators {
    authorized: bool,
    unauthorized: bool,
    history: Vec<(Indicator, bool)>,
}

impl MockIndicators {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of `indicator`.
    pub fn is_lit(&self, indicator: Indicator) -> bool {
        match indicator {
            Indicator::Authorized => self.authorized,
            Indicator::Unauthorized => self.unauthorized,
        }
    }

    /// Every `(indicator, level)` change in order.
    pub fn history(&self) -> &[(Indicator, bool)] {
        &self.history
    }

    /// Number of times `indicator` was switched on.
    pub fn pulses(&self, indicator: Indicator) -> usize {
        self.history
            .iter()
            .filter(|&&(which, lit)| which == indicator && lit)
            .count()
    }
}

impl IndicatorOutput for MockIndicators {
    fn set(&mut self, indicator: Indicator, lit: bool) -> Result<()> {
        debug!("{} indicator {}", indicator, if lit { "on" } else { "off" });
        match indicator {
            Indicator::Authorized => self.authorized = lit,
            Indicator::Unauthorized => self.unauthorized = lit,
        }
        self.history.push((indicator, lit));
        Ok(())
    }
}

/// Mock delay that only accumulates the requested time.
#[derive(Debug, Clone, Default)]
pub struct MockDelay {
    total_ms: u64,
    calls: usize,
}

impl MockDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total milliseconds requested.
    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    /// Number of delay calls.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl DelayMs for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
        self.calls += 1;
    }
}

//! Shared harness for firmware integration tests.
//!
//! A [`Rig`] wires a dispatcher to mock peripherals and plays both the timer
//! interrupt and the scanner, so tests read as a script of boot, scans and
//! elapsed time.

#![allow(dead_code)]

use portero_firmware::{AccessAttempt, Clock, Dispatcher, FirmwareConfig, Peripherals, Step};
use portero_hardware::mock::{
    MockDelay, MockEeprom, MockIndicators, MockInterrupts, MockSerial, MockSerialHandle,
};

pub type MockDispatcher<'c> =
    Dispatcher<'c, MockSerial, MockEeprom, MockIndicators, MockDelay, MockInterrupts>;

pub struct Rig<'c> {
    pub clock: &'c Clock,
    pub dispatcher: MockDispatcher<'c>,
    pub handle: MockSerialHandle,
    interrupts: MockInterrupts,
}

impl<'c> Rig<'c> {
    /// Boot a dispatcher on blank storage.
    pub fn boot(clock: &'c Clock, config: &FirmwareConfig) -> Self {
        Self::boot_with_storage(clock, config, MockEeprom::new())
    }

    pub fn boot_with_storage(clock: &'c Clock, config: &FirmwareConfig, storage: MockEeprom) -> Self {
        let (link, handle) = MockSerial::new();
        let interrupts = MockInterrupts::new();
        let mut dispatcher = Dispatcher::new(
            clock,
            Peripherals {
                link,
                storage,
                indicators: MockIndicators::new(),
                delay: MockDelay::new(),
                interrupts: interrupts.clone(),
            },
            config,
        )
        .unwrap();
        dispatcher.start().unwrap();

        Self {
            clock,
            dispatcher,
            handle,
            interrupts,
        }
    }

    /// Fire the timer interrupt for `seconds` worth of ticks.
    pub fn elapse(&self, seconds: u32) {
        let ticks = seconds * u32::from(self.clock.ticks_per_second());
        for _ in 0..ticks {
            self.interrupts.interrupt(|| self.clock.on_tick());
        }
    }

    /// Present a code followed by CR and run one loop pass per byte.
    pub fn scan(&mut self, code: &str) -> Vec<AccessAttempt> {
        self.handle.send_code(code).unwrap();
        (0..=code.len())
            .filter_map(|_| self.dispatcher.step().unwrap().attempt)
            .collect()
    }

    /// One loop pass with no pending input.
    pub fn idle(&mut self) -> Step {
        self.dispatcher.step().unwrap()
    }

    pub fn lines(&mut self) -> Vec<String> {
        self.handle.take_lines()
    }
}

/// Default configuration with `id` in slot 3.
pub fn config_with_slot3(id: &str) -> FirmwareConfig {
    let mut config = FirmwareConfig::default();
    config.roster[2] = id.parse().unwrap();
    config
}

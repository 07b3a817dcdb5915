//! Main polling loop.
//!
//! Each pass applies the flush policy, polls the serial link for at most one
//! byte and, when that byte completes a read, decides, records and signals the
//! access attempt. Nothing in a pass suspends; the only waits are the
//! hardware-bounded ones inside the peripherals and the indicator pulse.

use crate::{
    Clock, CredentialStore, EventLog, FirmwareConfig, FlushOutcome, IdentifierReader, Provisioning,
    ReadResult, Result,
};
use portero_core::{Identifier, RawCode, constants::CREDENTIAL_SLOTS};
use portero_hardware::{
    DelayMs, Indicator, IndicatorOutput, InterruptControl, NonVolatileMemory, SerialLink,
};
use tracing::{debug, info, warn};

/// The peripherals a [`Dispatcher`] takes ownership of.
#[derive(Debug)]
pub struct Peripherals<L, M, O, D, I> {
    pub link: L,
    pub storage: M,
    pub indicators: O,
    pub delay: D,
    pub interrupts: I,
}

/// A completed read and the decision taken on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessAttempt {
    pub code: RawCode,
    pub authorized: bool,
    /// `false` if the event log refused the record.
    pub recorded: bool,
}

/// Observable result of one loop pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub flush: FlushOutcome,
    pub attempt: Option<AccessAttempt>,
}

pub struct Dispatcher<'c, L, M, O, D, I> {
    link: L,
    credentials: CredentialStore<M>,
    indicators: O,
    delay: D,
    interrupts: I,
    reader: IdentifierReader,
    log: EventLog<'c>,
    roster: [Identifier; CREDENTIAL_SLOTS],
    pulse_ms: u32,
}

impl<'c, L, M, O, D, I> Dispatcher<'c, L, M, O, D, I>
where
    L: SerialLink,
    M: NonVolatileMemory,
    O: IndicatorOutput,
    D: DelayMs,
    I: InterruptControl,
{
    /// # Errors
    /// Returns `Error::Core(Config)` if `config` does not pass
    /// [`FirmwareConfig::validate`] or `clock` ticks at another rate than
    /// `config` names.
    pub fn new(
        clock: &'c Clock,
        peripherals: Peripherals<L, M, O, D, I>,
        config: &FirmwareConfig,
    ) -> Result<Self> {
        config.validate()?;
        if clock.ticks_per_second() != config.ticks_per_second {
            return Err(portero_core::Error::config(format!(
                "Clock runs at {} ticks per second, configuration expects {}",
                clock.ticks_per_second(),
                config.ticks_per_second
            ))
            .into());
        }

        let Peripherals {
            link,
            storage,
            indicators,
            delay,
            interrupts,
        } = peripherals;

        Ok(Self {
            link,
            credentials: CredentialStore::new(storage).with_verification(config.verify_writes),
            indicators,
            delay,
            interrupts,
            reader: IdentifierReader::new(),
            log: EventLog::new(clock).with_flush_interval(config.flush_interval_secs),
            roster: config.roster,
            pulse_ms: config.indicator_pulse_ms,
        })
    }

    /// Boot sequence: provision credential storage if it is blank.
    ///
    /// # Errors
    /// Returns an error if a provisioning write fails.
    pub fn start(&mut self) -> Result<Provisioning> {
        let provisioning = self
            .credentials
            .provision_if_blank(&self.interrupts, &self.roster)?;
        info!("Dispatcher started ({:?})", provisioning);
        Ok(provisioning)
    }

    /// Run one pass of the loop.
    ///
    /// # Errors
    /// Returns link and indicator failures. A credential read failure is not
    /// an error: the attempt is denied and still recorded.
    pub fn step(&mut self) -> Result<Step> {
        let flush = self.log.maybe_flush(&mut self.link, &self.interrupts)?;

        let Some(byte) = self.link.poll_byte()? else {
            return Ok(Step {
                flush,
                attempt: None,
            });
        };

        let attempt = match self.reader.feed(byte) {
            None => None,
            Some(result) => Some(self.handle_read(result)?),
        };
        Ok(Step { flush, attempt })
    }

    fn handle_read(&mut self, result: ReadResult) -> Result<AccessAttempt> {
        let (code, authorized) = match result {
            ReadResult::Candidate(id) => {
                let authorized = match self.credentials.contains(&id) {
                    Ok(found) => found,
                    Err(e) => {
                        warn!("Credential lookup failed, denying '{}': {}", id, e);
                        false
                    }
                };
                (RawCode::from(id), authorized)
            }
            ReadResult::Malformed(code) => (code, false),
        };

        let recorded = self.log.record(code.clone(), authorized);
        info!(
            "Access {} for '{}'",
            if authorized { "granted" } else { "denied" },
            code
        );
        self.pulse(Indicator::for_decision(authorized))?;

        Ok(AccessAttempt {
            code,
            authorized,
            recorded,
        })
    }

    fn pulse(&mut self, indicator: Indicator) -> Result<()> {
        debug!("Pulsing {} indicator for {} ms", indicator, self.pulse_ms);
        self.indicators.set(indicator, true)?;
        self.delay.delay_ms(self.pulse_ms);
        self.indicators.set(indicator, false)?;
        Ok(())
    }

    /// Poll forever. Errors are logged and the loop carries on.
    pub fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.step() {
                warn!("Dispatcher step failed: {}", e);
            }
        }
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn indicators(&self) -> &O {
        &self.indicators
    }

    pub fn delay(&self) -> &D {
        &self.delay
    }

    pub fn interrupts(&self) -> &I {
        &self.interrupts
    }

    pub fn credentials(&self) -> &CredentialStore<M> {
        &self.credentials
    }

    pub fn event_log(&self) -> &EventLog<'c> {
        &self.log
    }

    pub fn reader(&self) -> &IdentifierReader {
        &self.reader
    }
}

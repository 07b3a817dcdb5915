//! Buffered access events and the report flush policy.
//!
//! Up to five events are held between flushes. A flush is triggered either by
//! the buffer filling up or by the flush interval elapsing on the [`Clock`].
//! An interval with no events produces a single idle notification instead.
//!
//! ```text
//!  record ──► [e0 e1 e2 e3 e4] ──full──► flush ──► link
//!                    │
//!           interval elapsed ──► flush (or idle notification when empty)
//! ```

use crate::{Clock, Result};
use portero_core::{
    AccessEvent, RawCode, ReportLine,
    constants::{DEFAULT_FLUSH_INTERVAL_SECS, EVENT_LOG_CAPACITY},
};
use portero_hardware::{InterruptControl, SerialLink};
use tracing::{debug, info, warn};

/// What [`EventLog::maybe_flush`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Neither the interval nor the capacity threshold was reached.
    Idle,
    /// Buffered events were transmitted and the clock was reset.
    Flushed { lines: usize },
    /// The interval elapsed with nothing buffered.
    NoEvents,
}

#[derive(Debug)]
pub struct EventLog<'c> {
    events: heapless::Vec<AccessEvent, EVENT_LOG_CAPACITY>,
    last_flush: u16,
    clock: &'c Clock,
    flush_interval: u16,
}

impl<'c> EventLog<'c> {
    #[must_use]
    pub fn new(clock: &'c Clock) -> Self {
        Self {
            events: heapless::Vec::new(),
            last_flush: 0,
            clock,
            flush_interval: DEFAULT_FLUSH_INTERVAL_SECS,
        }
    }

    /// Override the flush interval (seconds, whole minutes).
    #[must_use]
    pub fn with_flush_interval(mut self, secs: u16) -> Self {
        self.flush_interval = secs;
        self
    }

    /// Append an event stamped with the current clock value.
    ///
    /// Returns `false` without touching stored entries when the log is full.
    pub fn record(&mut self, code: RawCode, authorized: bool) -> bool {
        let event = AccessEvent::new(self.clock.now(), code, authorized);
        match self.events.push(event) {
            Ok(()) => {
                debug!(
                    "Recorded event {} of {}",
                    self.events.len(),
                    EVENT_LOG_CAPACITY
                );
                true
            }
            Err(dropped) => {
                warn!("Event log full, dropping record for '{}'", dropped.code);
                false
            }
        }
    }

    /// Apply the flush policy.
    ///
    /// # Errors
    /// Returns the first link error. The log is cleared and the clock reset
    /// even when transmission fails.
    pub fn maybe_flush<L, I>(&mut self, link: &mut L, interrupts: &I) -> Result<FlushOutcome>
    where
        L: SerialLink,
        I: InterruptControl,
    {
        let now = self.clock.now();
        if now.wrapping_sub(self.last_flush) >= self.flush_interval {
            if self.events.is_empty() {
                // Advance first so a failing link is not retried every pass.
                self.last_flush = now;
                let minutes = self.flush_interval / 60;
                info!("No events in the last {} minutes", minutes);
                send_line(link, &ReportLine::NoEvents { minutes })?;
                return Ok(FlushOutcome::NoEvents);
            }
            let lines = self.flush(link, interrupts)?;
            return Ok(FlushOutcome::Flushed { lines });
        }

        if self.is_full() {
            let lines = self.flush(link, interrupts)?;
            return Ok(FlushOutcome::Flushed { lines });
        }

        Ok(FlushOutcome::Idle)
    }

    /// Transmit every buffered event, oldest first, then reset.
    ///
    /// Returns the number of lines sent.
    ///
    /// # Errors
    /// Returns the first link error; remaining events are discarded.
    pub fn flush<L, I>(&mut self, link: &mut L, interrupts: &I) -> Result<usize>
    where
        L: SerialLink,
        I: InterruptControl,
    {
        let mut sent = 0;
        let mut outcome = Ok(());
        for event in &self.events {
            if let Err(e) = send_line(link, &ReportLine::Event(event.clone())) {
                warn!(
                    "Report transmission failed after {} of {} lines: {}",
                    sent,
                    self.events.len(),
                    e
                );
                outcome = Err(e);
                break;
            }
            sent += 1;
        }

        self.events.clear();
        interrupts.free(|cs| self.clock.reset(cs));
        self.last_flush = 0;
        info!("Flushed {} events", sent);

        outcome.map(|()| sent)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.events.is_full()
    }

    /// Buffered events in insertion order.
    #[must_use]
    pub fn events(&self) -> &[AccessEvent] {
        &self.events
    }

    /// Clock value at the last flush or idle notification.
    #[must_use]
    pub fn last_flush(&self) -> u16 {
        self.last_flush
    }

    /// Position the next record would occupy.
    #[must_use]
    pub fn next_write_index(&self) -> usize {
        self.events.len() % EVENT_LOG_CAPACITY
    }

    #[must_use]
    pub fn flush_interval(&self) -> u16 {
        self.flush_interval
    }
}

fn send_line<L: SerialLink>(link: &mut L, line: &ReportLine) -> Result<()> {
    line.encode(|chunk| link.write_all(chunk))?;
    Ok(())
}

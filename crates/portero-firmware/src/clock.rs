//! Seconds counter advanced by the timer interrupt.
//!
//! The interrupt handler is the only writer of the tick and seconds counters,
//! so both are plain atomic load/store cells; no read-modify-write instruction
//! is needed, which keeps the clock usable on cores without compare-and-swap.
//! The main loop reads `seconds` with [`Clock::now`] and may observe a value
//! one tick stale, never a torn one.
//!
//! The single exception is [`Clock::reset`], issued by the main loop during a
//! flush. It takes a [`CriticalSection`] token so the interrupt cannot load the
//! old count before the reset and store it back incremented afterwards.
//!
//! ```
//! use portero_firmware::Clock;
//!
//! static CLOCK: Clock = Clock::new(244);
//!
//! for _ in 0..244 {
//!     CLOCK.on_tick();
//! }
//! assert_eq!(CLOCK.now(), 1);
//! ```

use portero_hardware::CriticalSection;
use std::sync::atomic::{AtomicU8, AtomicU16, Ordering};

/// Monotonic seconds counter since the last flush.
#[derive(Debug)]
pub struct Clock {
    ticks: AtomicU8,
    seconds: AtomicU16,
    ticks_per_second: u8,
}

impl Clock {
    /// Create a stopped clock at zero.
    #[must_use]
    pub const fn new(ticks_per_second: u8) -> Self {
        Self {
            ticks: AtomicU8::new(0),
            seconds: AtomicU16::new(0),
            ticks_per_second,
        }
    }

    /// Timer interrupt body.
    pub fn on_tick(&self) {
        let ticks = self.ticks.load(Ordering::Relaxed).wrapping_add(1);
        if ticks >= self.ticks_per_second {
            self.ticks.store(0, Ordering::Relaxed);
            let seconds = self.seconds.load(Ordering::Relaxed);
            self.seconds
                .store(seconds.wrapping_add(1), Ordering::Release);
        } else {
            self.ticks.store(ticks, Ordering::Relaxed);
        }
    }

    /// Seconds counted since start or the last reset.
    #[must_use]
    pub fn now(&self) -> u16 {
        self.seconds.load(Ordering::Acquire)
    }

    /// Zero the seconds counter.
    ///
    /// The sub-second tick phase is kept.
    pub fn reset(&self, _cs: &CriticalSection<'_>) {
        self.seconds.store(0, Ordering::Release);
    }

    /// Ticks accumulated towards the next second.
    #[must_use]
    pub fn ticks(&self) -> u8 {
        self.ticks.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn ticks_per_second(&self) -> u8 {
        self.ticks_per_second
    }
}

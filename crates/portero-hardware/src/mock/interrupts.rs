//! Host stand-in for the global interrupt enable.
//!
//! On the host the "interrupt" is a task or thread calling
//! [`MockInterrupts::interrupt`]. It shares a mutex with
//! [`InterruptControl::free`], so an interrupt body never runs while a
//! critical section is open.

use crate::critical::{CriticalSection, InterruptControl};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Debug, Default)]
struct InterruptState {
    mask: Mutex<()>,
    masked: AtomicBool,
    sections: AtomicUsize,
    serviced: AtomicUsize,
}

/// Cloneable interrupt controller; clones share one mask.
#[derive(Debug, Clone, Default)]
pub struct MockInterrupts {
    state: Arc<InterruptState>,
}

impl MockInterrupts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run an interrupt service routine, waiting while interrupts are masked.
    pub fn interrupt<R>(&self, isr: impl FnOnce() -> R) -> R {
        let _unmasked = self
            .state
            .mask
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.state.serviced.fetch_add(1, Ordering::Relaxed);
        isr()
    }

    /// Number of critical sections entered so far.
    pub fn sections(&self) -> usize {
        self.state.sections.load(Ordering::Relaxed)
    }

    /// Number of interrupt bodies run so far.
    pub fn serviced(&self) -> usize {
        self.state.serviced.load(Ordering::Relaxed)
    }

    /// Returns `true` while a critical section is open.
    pub fn is_masked(&self) -> bool {
        self.state.masked.load(Ordering::Acquire)
    }
}

impl InterruptControl for MockInterrupts {
    fn free<R>(&self, f: impl FnOnce(&CriticalSection<'_>) -> R) -> R {
        let _masked = self
            .state
            .mask
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        self.state.masked.store(true, Ordering::Release);
        self.state.sections.fetch_add(1, Ordering::Relaxed);

        // SAFETY: the mask mutex is held until the token is dropped, so no
        // `interrupt` body can run concurrently.
        let cs = unsafe { CriticalSection::new() };
        let result = f(&cs);

        self.state.masked.store(false, Ordering::Release);
        result
    }
}

//! Interrupt masking.
//!
//! The only state shared with the timer interrupt is the clock, and the only
//! sequence that must not be interrupted is the EEPROM write unlock. Both take
//! a [`CriticalSection`] token, which can only be obtained inside
//! [`InterruptControl::free`].

use std::marker::PhantomData;

/// Proof that asynchronous interrupts are masked for lifetime `'cs`.
#[derive(Debug)]
pub struct CriticalSection<'cs> {
    _masked: PhantomData<&'cs ()>,
}

impl CriticalSection<'_> {
    /// Create a token.
    ///
    /// # Safety
    ///
    /// The caller must guarantee that no interrupt handler touching shared
    /// state can run while the token is alive.
    #[must_use]
    pub unsafe fn new() -> Self {
        Self {
            _masked: PhantomData,
        }
    }
}

/// Global interrupt enable control.
///
/// # Examples
///
/// ```
/// use portero_hardware::critical::InterruptControl;
/// use portero_hardware::mock::MockInterrupts;
///
/// let interrupts = MockInterrupts::new();
/// let value = interrupts.free(|_cs| 42);
/// assert_eq!(value, 42);
/// assert_eq!(interrupts.sections(), 1);
/// ```
pub trait InterruptControl {
    /// Run `f` with interrupts masked and restore them afterwards.
    ///
    /// Implementations are not required to support nesting.
    fn free<R>(&self, f: impl FnOnce(&CriticalSection<'_>) -> R) -> R;
}

//! In-memory EEPROM.

use crate::{HardwareError, Result, critical::CriticalSection, traits::NonVolatileMemory};
use portero_core::constants::{EEPROM_SIZE, ERASED_BYTE};

/// Mock data EEPROM backed by an array.
///
/// Starts erased (every cell `0xFF`). Writes follow the two-phase protocol of
/// [`NonVolatileMemory`]: a cell changes only once the write is waited on.
///
/// # Examples
///
/// ```
/// use portero_hardware::critical::InterruptControl;
/// use portero_hardware::mock::{MockEeprom, MockInterrupts};
/// use portero_hardware::traits::NonVolatileMemory;
///
/// let mut eeprom = MockEeprom::new();
/// let interrupts = MockInterrupts::new();
///
/// assert_eq!(eeprom.read(0).unwrap(), 0xFF);
/// interrupts.free(|cs| eeprom.begin_write(cs, 0, b'4')).unwrap();
/// eeprom.wait_write_complete().unwrap();
/// assert_eq!(eeprom.read(0).unwrap(), b'4');
/// ```
#[derive(Debug, Clone)]
pub struct MockEeprom {
    cells: [u8; EEPROM_SIZE],

    /// Write started but not yet completed
    pending: Option<(u8, u8)>,

    /// Completed writes
    writes: usize,

    /// Cell that silently ignores writes
    stuck: Option<u8>,
}

impl MockEeprom {
    /// Create an erased EEPROM.
    pub fn new() -> Self {
        Self {
            cells: [ERASED_BYTE; EEPROM_SIZE],
            pending: None,
            writes: 0,
            stuck: None,
        }
    }

    /// Create an EEPROM whose leading cells hold `contents`; the rest stay
    /// erased.
    ///
    /// # Errors
    ///
    /// Returns an error if `contents` is larger than the device.
    pub fn with_contents(contents: &[u8]) -> Result<Self> {
        if contents.len() > EEPROM_SIZE {
            return Err(HardwareError::invalid_data(format!(
                "EEPROM holds {EEPROM_SIZE} bytes, got {}",
                contents.len()
            )));
        }
        let mut eeprom = Self::new();
        eeprom.cells[..contents.len()].copy_from_slice(contents);
        Ok(eeprom)
    }

    /// Make writes to `address` have no effect, simulating a worn cell.
    pub fn with_stuck_cell(mut self, address: u8) -> Self {
        self.stuck = Some(address);
        self
    }

    /// Current contents of every cell.
    pub fn cells(&self) -> &[u8; EEPROM_SIZE] {
        &self.cells
    }

    /// Number of completed writes.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Returns `true` if a write has been started and not waited on.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for MockEeprom {
    fn default() -> Self {
        Self::new()
    }
}

impl NonVolatileMemory for MockEeprom {
    fn read(&mut self, address: u8) -> Result<u8> {
        if self.pending.is_some() {
            return Err(HardwareError::storage(address, "read during write"));
        }
        Ok(self.cells[usize::from(address)])
    }

    fn begin_write(&mut self, _cs: &CriticalSection<'_>, address: u8, value: u8) -> Result<()> {
        if self.pending.is_some() {
            return Err(HardwareError::storage(address, "write already in progress"));
        }
        self.pending = Some((address, value));
        Ok(())
    }

    fn wait_write_complete(&mut self) -> Result<()> {
        if let Some((address, value)) = self.pending.take() {
            if self.stuck != Some(address) {
                self.cells[usize::from(address)] = value;
            }
            self.writes += 1;
        }
        Ok(())
    }
}

//! Data EEPROM persisted to a host file.
//!
//! The file is a raw 256-byte image. A missing file reads as an erased part,
//! so the first run provisions the default roster and later runs keep it.

use portero_core::constants::{EEPROM_SIZE, ERASED_BYTE};
use portero_hardware::{CriticalSection, HardwareError, NonVolatileMemory, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub struct FileEeprom {
    path: PathBuf,
    cells: [u8; EEPROM_SIZE],
    pending: Option<(u8, u8)>,
}

impl FileEeprom {
    /// Load the image at `path`, or start erased if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not exactly 256
    /// bytes long.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut cells = [ERASED_BYTE; EEPROM_SIZE];

        match fs::read(&path) {
            Ok(image) => {
                if image.len() != EEPROM_SIZE {
                    return Err(HardwareError::invalid_data(format!(
                        "EEPROM image {} is {} bytes, expected {EEPROM_SIZE}",
                        path.display(),
                        image.len()
                    )));
                }
                cells.copy_from_slice(&image);
                info!("Loaded EEPROM image from {}", path.display());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No EEPROM image at {}, starting erased", path.display());
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self {
            path,
            cells,
            pending: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cells(&self) -> &[u8; EEPROM_SIZE] {
        &self.cells
    }
}

impl NonVolatileMemory for FileEeprom {
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
        let Some((address, value)) = self.pending.take() else {
            return Ok(());
        };
        self.cells[usize::from(address)] = value;
        fs::write(&self.path, self.cells)
            .map_err(|e| HardwareError::storage(address, format!("persisting image: {e}")))?;
        debug!("EEPROM[{:#04x}] = {:#04x}", address, value);
        Ok(())
    }
}

//! Authorized identifiers persisted in the data EEPROM.
//!
//! # Layout
//!
//! ```text
//! address  0        8        16       24       32       40
//!          | slot 1 | slot 2 | slot 3 | slot 4 | slot 5 | unused ...
//! ```
//!
//! Each slot holds the eight identifier bytes raw, with no terminator. A blank
//! part reads `0xFF` at address 0, which triggers one-time provisioning from
//! the compiled-in roster.

use crate::{Error, Result};
use portero_core::{
    Identifier,
    constants::{
        CREDENTIAL_BASE_ADDRESS, CREDENTIAL_SLOT_STRIDE, CREDENTIAL_SLOTS, ERASED_BYTE,
        IDENTIFIER_LENGTH, PROVISIONING_SENTINEL_ADDRESS,
    },
};
use portero_hardware::{InterruptControl, NonVolatileMemory};
use tracing::{debug, info, warn};

/// Result of [`CredentialStore::provision_if_blank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioning {
    /// Storage was blank; the roster has been written.
    Provisioned,
    /// Storage already held credentials and was left untouched.
    AlreadyProvisioned,
}

/// Fixed set of five credential slots.
#[derive(Debug)]
pub struct CredentialStore<M> {
    memory: M,
    verify_writes: bool,
}

fn slot_address(slot: usize, offset: usize) -> u8 {
    // Slots end at byte 40, well inside an 8-bit address space.
    CREDENTIAL_BASE_ADDRESS + (slot * CREDENTIAL_SLOT_STRIDE + offset) as u8
}

fn check_slot(slot: usize) -> Result<()> {
    if slot >= CREDENTIAL_SLOTS {
        return Err(Error::SlotOutOfRange {
            slot,
            max: CREDENTIAL_SLOTS - 1,
        });
    }
    Ok(())
}

impl<M: NonVolatileMemory> CredentialStore<M> {
    pub fn new(memory: M) -> Self {
        Self {
            memory,
            verify_writes: false,
        }
    }

    /// Read back every byte written and fail on mismatch.
    pub fn with_verification(mut self, verify_writes: bool) -> Self {
        self.verify_writes = verify_writes;
        self
    }

    /// Returns `true` if the sentinel cell reads as erased.
    ///
    /// # Errors
    /// Returns an error if the sentinel cannot be read.
    pub fn is_blank(&mut self) -> Result<bool> {
        Ok(self.memory.read(PROVISIONING_SENTINEL_ADDRESS)? == ERASED_BYTE)
    }

    /// Write `roster` into the five slots if storage is blank.
    ///
    /// Calling it again once provisioned is a no-op.
    ///
    /// # Errors
    /// Returns an error if a write fails or, with verification enabled, does
    /// not read back.
    pub fn provision_if_blank<I: InterruptControl>(
        &mut self,
        interrupts: &I,
        roster: &[Identifier; CREDENTIAL_SLOTS],
    ) -> Result<Provisioning> {
        if !self.is_blank()? {
            debug!("Credential storage already provisioned");
            return Ok(Provisioning::AlreadyProvisioned);
        }

        info!("Credential storage blank, writing default roster");
        for (slot, id) in roster.iter().enumerate() {
            self.store_slot(interrupts, slot, id)?;
        }
        Ok(Provisioning::Provisioned)
    }

    /// Overwrite one slot (zero-based).
    ///
    /// # Errors
    /// Returns `Error::SlotOutOfRange` for `slot >= 5`, or any write failure.
    pub fn store_slot<I: InterruptControl>(
        &mut self,
        interrupts: &I,
        slot: usize,
        id: &Identifier,
    ) -> Result<()> {
        check_slot(slot)?;
        for (offset, &byte) in id.as_bytes().iter().enumerate() {
            self.write_byte(interrupts, slot_address(slot, offset), byte)?;
        }
        debug!("Stored credential slot {}", slot + 1);
        Ok(())
    }

    fn write_byte<I: InterruptControl>(
        &mut self,
        interrupts: &I,
        address: u8,
        value: u8,
    ) -> Result<()> {
        // Only the unlock sequence runs masked; programming completes with
        // the timer interrupt enabled.
        interrupts.free(|cs| self.memory.begin_write(cs, address, value))?;
        self.memory.wait_write_complete()?;

        if self.verify_writes {
            let actual = self.memory.read(address)?;
            if actual != value {
                warn!(
                    "EEPROM verification failed at {:#04x}: wrote {:#04x}, read {:#04x}",
                    address, value, actual
                );
                return Err(Error::VerificationFailed {
                    address,
                    expected: value,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Raw bytes of one slot (zero-based).
    ///
    /// # Errors
    /// Returns `Error::SlotOutOfRange` for `slot >= 5`, or any read failure.
    pub fn read_slot(&mut self, slot: usize) -> Result<[u8; IDENTIFIER_LENGTH]> {
        check_slot(slot)?;
        let mut stored = [0u8; IDENTIFIER_LENGTH];
        for (offset, byte) in stored.iter_mut().enumerate() {
            *byte = self.memory.read(slot_address(slot, offset))?;
        }
        Ok(stored)
    }

    /// Returns `true` if `id` equals one of the stored identifiers exactly.
    ///
    /// Slots are checked in order and the search stops at the first match.
    ///
    /// # Errors
    /// Returns an error if a slot cannot be read.
    pub fn contains(&mut self, id: &Identifier) -> Result<bool> {
        for slot in 0..CREDENTIAL_SLOTS {
            let stored = self.read_slot(slot)?;
            if id.matches(&stored) {
                debug!("Identifier {} matches slot {}", id, slot + 1);
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn into_inner(self) -> M {
        self.memory
    }
}

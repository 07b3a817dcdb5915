//! Property-based tests for the event log, matching and report formatting.
//!
//! These use proptest to check that the buffering and matching invariants
//! hold for arbitrary event sequences and rosters, not just the fixed cases
//! of the unit tests.

use portero_core::{AccessEvent, Identifier, RawCode, ReportLine, constants::EVENT_LOG_CAPACITY};
use portero_firmware::{Clock, CredentialStore, EventLog};
use portero_hardware::mock::{MockEeprom, MockInterrupts, MockSerial};
use proptest::prelude::*;

/// Strategy for codes as the reader can produce them: up to 8 printable bytes.
fn logged_code() -> impl Strategy<Value = RawCode> {
    prop::string::string_regex("[0-9A-Za-z@]{0,8}")
        .expect("Failed to create code regex strategy")
        .prop_map(|s| s.parse().unwrap())
}

/// Strategy for 8-digit identifiers.
fn identifier() -> impl Strategy<Value = Identifier> {
    prop::string::string_regex("[0-9]{8}")
        .expect("Failed to create identifier regex strategy")
        .prop_map(|s| s.parse().unwrap())
}

/// Strategy for a record: seconds elapsed before it, code, decision.
fn record() -> impl Strategy<Value = (u8, RawCode, bool)> {
    (0u8..60, logged_code(), any::<bool>())
}

proptest! {
    /// Property: flushing up to five events emits exactly those events, oldest
    /// first, and leaves an empty log and a zeroed clock.
    #[test]
    fn prop_flush_preserves_insertion_order(
        records in prop::collection::vec(record(), 0..=EVENT_LOG_CAPACITY),
    ) {
        let clock = Clock::new(1);
        let interrupts = MockInterrupts::new();
        let (mut link, mut handle) = MockSerial::new();
        let mut log = EventLog::new(&clock);

        let mut expected = Vec::new();
        for (gap, code, authorized) in &records {
            for _ in 0..*gap {
                clock.on_tick();
            }
            prop_assert!(log.record(code.clone(), *authorized));
            expected.push(AccessEvent::new(clock.now(), code.clone(), *authorized));
        }

        let sent = log.flush(&mut link, &interrupts).unwrap();
        prop_assert_eq!(sent, records.len());

        let lines = handle.take_lines();
        prop_assert_eq!(lines.len(), records.len());
        for (line, event) in lines.iter().zip(&expected) {
            let parsed: ReportLine = line.parse().unwrap();
            prop_assert_eq!(parsed, ReportLine::Event(event.clone()));
        }

        prop_assert!(log.is_empty());
        prop_assert_eq!(log.next_write_index(), 0);
        prop_assert_eq!(clock.now(), 0);
    }

    /// Property: records against a full log never change what is stored.
    #[test]
    fn prop_records_beyond_capacity_are_noops(
        initial in prop::collection::vec(record(), EVENT_LOG_CAPACITY),
        extra in prop::collection::vec(record(), 1..10),
    ) {
        let clock = Clock::new(1);
        let mut log = EventLog::new(&clock);
        for (_, code, authorized) in initial {
            log.record(code, authorized);
        }
        let before = log.events().to_vec();

        for (gap, code, authorized) in extra {
            for _ in 0..gap {
                clock.on_tick();
            }
            prop_assert!(!log.record(code, authorized));
        }
        prop_assert_eq!(log.events(), before.as_slice());
        prop_assert_eq!(log.len(), EVENT_LOG_CAPACITY);
    }

    /// Property: an identifier differing from a provisioned one in any single
    /// position is rejected, and every provisioned one is accepted.
    #[test]
    fn prop_contains_requires_exact_match(
        roster in prop::array::uniform5(identifier()),
        slot in 0usize..5,
        position in 0usize..8,
        replacement in b'0'..=b'9',
    ) {
        let interrupts = MockInterrupts::new();
        let mut store = CredentialStore::new(MockEeprom::new());
        store.provision_if_blank(&interrupts, &roster).unwrap();

        for id in &roster {
            prop_assert!(store.contains(id).unwrap());
        }

        let mut bytes = *roster[slot].as_bytes();
        prop_assume!(bytes[position] != replacement);
        bytes[position] = replacement;
        let mutated = Identifier::from_bytes(bytes);
        prop_assume!(!roster.contains(&mutated));

        prop_assert!(!store.contains(&mutated).unwrap());
    }

    /// Property: provisioning a second time never alters storage.
    #[test]
    fn prop_provisioning_is_idempotent(
        first in prop::array::uniform5(identifier()),
        second in prop::array::uniform5(identifier()),
    ) {
        let interrupts = MockInterrupts::new();
        let mut store = CredentialStore::new(MockEeprom::new());
        store.provision_if_blank(&interrupts, &first).unwrap();
        let before = *store.memory().cells();

        store.provision_if_blank(&interrupts, &second).unwrap();
        prop_assert_eq!(store.memory().cells(), &before);
    }

    /// Property: timestamps up to 9999 render as exactly four digits.
    #[test]
    fn prop_timestamp_is_four_digits(timestamp in 0u16..=9999, code in logged_code()) {
        let line = ReportLine::Event(AccessEvent::new(timestamp, code, true)).to_string();
        let field = line
            .strip_prefix("tiempo=")
            .and_then(|rest| rest.split(", ").next())
            .unwrap();
        prop_assert_eq!(field.len(), 4);
        prop_assert_eq!(field.parse::<u16>().unwrap(), timestamp);
    }
}

//! Performance benchmarks for the firmware hot path.
//!
//! Each access attempt costs one credential lookup over five EEPROM slots, a
//! reader pass over nine bytes and, at flush, one report line per event.
//!
//! Run benchmarks with:
//! ```sh
//! cargo bench --bench firmware_bench
//! ```

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use portero_core::{AccessEvent, Identifier, ReportLine};
use portero_firmware::{Clock, CredentialStore, EventLog, FirmwareConfig, IdentifierReader};
use portero_hardware::mock::{MockEeprom, MockInterrupts, MockSerial};
use std::hint::black_box;

fn provisioned_store() -> CredentialStore<MockEeprom> {
    let interrupts = MockInterrupts::new();
    let mut store = CredentialStore::new(MockEeprom::new());
    store
        .provision_if_blank(&interrupts, &FirmwareConfig::default().roster)
        .unwrap();
    store
}

/// Benchmark lookups hitting the first slot, the last slot and none.
fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("credential_contains");
    group.throughput(Throughput::Elements(1));

    let mut store = provisioned_store();
    let cases = [
        ("first_slot", "49432642"),
        ("last_slot", "49374418"),
        ("miss", "12345678"),
    ];

    for (name, id) in cases {
        let id: Identifier = id.parse().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &id, |b, id| {
            b.iter(|| black_box(store.contains(black_box(id)).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark assembling one well-formed and one overlong read.
fn bench_reader(c: &mut Criterion) {
    let mut group = c.benchmark_group("identifier_reader");

    for input in [&b"49432642\r"[..], &b"123456789012345678\r"[..]] {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(input.len()), input, |b, input| {
            let mut reader = IdentifierReader::new();
            b.iter(|| {
                for &byte in input {
                    black_box(reader.feed(black_box(byte)));
                }
            });
        });
    }

    group.finish();
}

/// Benchmark encoding a single report line into a byte buffer.
fn bench_encode_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("report_encode");
    group.throughput(Throughput::Elements(1));

    let line = ReportLine::Event(AccessEvent::new(42, "49432642".parse().unwrap(), true));
    let mut wire = Vec::with_capacity(64);

    group.bench_function("event_line", |b| {
        b.iter(|| {
            wire.clear();
            black_box(&line)
                .encode(|chunk| {
                    wire.extend_from_slice(chunk);
                    Ok::<_, ()>(())
                })
                .unwrap();
            black_box(&wire);
        });
    });

    group.finish();
}

/// Benchmark a full five-event flush over the mock link.
fn bench_flush(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_log_flush");
    group.throughput(Throughput::Elements(5));

    let clock = Clock::new(1);
    let interrupts = MockInterrupts::new();
    let (mut link, mut handle) = MockSerial::new();

    group.bench_function("five_events", |b| {
        b.iter(|| {
            let mut log = EventLog::new(&clock);
            for _ in 0..5 {
                log.record("49432642".parse().unwrap(), true);
            }
            black_box(log.flush(&mut link, &interrupts).unwrap());
            handle.take_output();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_contains,
    bench_reader,
    bench_encode_line,
    bench_flush
);
criterion_main!(benches);

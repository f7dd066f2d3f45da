//! Snowflake generation through the public API.

use std::collections::HashSet;
use std::sync::Arc;

use pretty_assertions::assert_eq;

use chat_core::domain::{Snowflake, DEFAULT_EPOCH, SEQUENCE_BOUND};
use chat_core::shared::snowflake::{SnowflakeError, SnowflakeGenerator, WorkerIdentity};

use crate::common::{manual_generator, system_generator};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_tasks_never_collide() {
    // Fewer IDs than one millisecond's sequence space, so wraps cannot collide.
    let generator = system_generator(3, 7);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let generator = Arc::clone(&generator);
            tokio::spawn(async move {
                let mut ids = Vec::with_capacity(500);
                for _ in 0..500 {
                    ids.push(generator.generate());
                    tokio::task::yield_now().await;
                }
                ids
            })
        })
        .collect();

    let mut all = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(all.insert(id), "duplicate id {}", id);
            assert_eq!(id.worker_id(), 3);
            assert_eq!(id.process_id(), 7);
        }
    }
    assert_eq!(all.len(), 4_000);
}

#[test]
fn test_single_caller_ids_strictly_increase() {
    let generator = system_generator(0, 0);

    let ids = generator.generate_many(4_000);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_identity_and_timestamp_round_trip() {
    let (_clock, generator) = manual_generator(123_456);

    let id = generator.generate();
    assert_eq!(id.delta_millis(), 123_456);
    assert_eq!(id.unix_millis(DEFAULT_EPOCH), DEFAULT_EPOCH + 123_456);
    assert_eq!(id.worker_id(), 1);
    assert_eq!(id.process_id(), 2);
    assert_eq!(id.sequence(), 0);
    assert!(id.is_valid());
}

#[test]
fn test_sequence_resets_when_clock_advances() {
    let (clock, generator) = manual_generator(50);

    let first: Vec<u16> = generator.generate_many(3).iter().map(Snowflake::sequence).collect();
    assert_eq!(first, vec![0, 1, 2]);

    clock.advance(1);
    let next = generator.generate();
    assert_eq!(next.sequence(), 0);
    assert_eq!(next.delta_millis(), 51);
}

#[test]
fn test_full_millisecond_wraps_sequence() {
    let (_clock, generator) = manual_generator(10);

    let ids = generator.generate_many(SEQUENCE_BOUND as usize + 1);
    assert_eq!(ids[SEQUENCE_BOUND as usize - 1].sequence(), (SEQUENCE_BOUND - 1) as u16);
    assert_eq!(ids[SEQUENCE_BOUND as usize].sequence(), 0);
}

#[test]
fn test_clock_regression_keeps_ids_increasing() {
    let (clock, generator) = manual_generator(10_000);

    let before = generator.generate();
    clock.set(DEFAULT_EPOCH + 9_000);
    let after = generator.generate();

    assert!(after > before);
    assert_eq!(after.delta_millis(), 10_000);
}

#[test]
fn test_slow_calls_during_long_regression_stay_unique() {
    let (clock, generator) = manual_generator(10_000);
    let mut last = generator.generate();

    clock.set(DEFAULT_EPOCH + 9_000);
    let mut seen = HashSet::from([last]);
    for call in 0..(SEQUENCE_BOUND as usize + 200) {
        if call % 8 == 0 {
            clock.advance(1);
        }
        let id = generator.generate();
        assert!(id > last, "id {} not after {} at call {}", id, last, call);
        assert!(seen.insert(id));
        last = id;
    }
    assert_eq!(last.delta_millis(), 10_001);
}

#[test]
fn test_construction_errors() {
    let identity = WorkerIdentity::default();

    assert!(matches!(
        WorkerIdentity::new(32, 0),
        Err(SnowflakeError::WorkerIdOutOfRange { .. })
    ));
    assert!(matches!(
        SnowflakeGenerator::with_system_clock(u64::MAX / 2, identity),
        Err(SnowflakeError::ClockBeforeEpoch { .. })
    ));
}

#[test]
fn test_machine_id_splits_into_worker_and_process() {
    let identity = WorkerIdentity::from_machine_id(0b10101_00011).unwrap();

    assert_eq!(identity.worker_id(), 0b10101);
    assert_eq!(identity.process_id(), 0b00011);
    assert!(WorkerIdentity::from_machine_id(1 << 10).is_err());
}

//! Message bucket derivation through the public API.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use test_case::test_case;

use chat_core::application::services::MessageService;
use chat_core::domain::{BucketError, BucketId, BucketWindow, Snowflake, DEFAULT_BUCKET_WINDOW_MS};

use crate::common::{manual_generator, DAY_MS};

#[test_case(0, 0 ; "epoch")]
#[test_case(DEFAULT_BUCKET_WINDOW_MS - 1, 0 ; "last millisecond of first window")]
#[test_case(DEFAULT_BUCKET_WINDOW_MS, 1 ; "first millisecond of second window")]
#[test_case(25 * DAY_MS, 2 ; "twenty five days")]
fn test_default_window_buckets(delta_ms: u64, expected: i64) {
    let window = BucketWindow::default();
    let id = Snowflake::from_parts(delta_ms, 4, 5, 6);

    assert_eq!(window.bucket_of(id).unwrap(), BucketId(expected));
}

#[test]
fn test_generated_ids_have_non_decreasing_buckets() {
    let (clock, generator) = manual_generator(0);
    let window = BucketWindow::new(DAY_MS).unwrap();

    let mut last = BucketId(0);
    for step in 0..50 {
        clock.advance(DAY_MS / 4 + step);
        let bucket = window.bucket_of(generator.generate()).unwrap();
        assert!(bucket >= last);
        last = bucket;
    }
    assert!(last > BucketId(10));
}

#[test]
fn test_bounds_contain_every_id_of_the_bucket() {
    let window = BucketWindow::new(DAY_MS).unwrap();
    let (low, high) = window.bounds(BucketId(4));

    assert_eq!(window.bucket_of(low).unwrap(), BucketId(4));
    assert_eq!(window.bucket_of(high).unwrap(), BucketId(4));
    assert_eq!(
        window.bucket_of(Snowflake::new(high.as_i64() + 1)).unwrap(),
        BucketId(5)
    );
    assert_eq!(
        window.bucket_of(Snowflake::new(low.as_i64() - 1)).unwrap(),
        BucketId(3)
    );
}

#[test]
fn test_negative_identifier_is_malformed() {
    let window = BucketWindow::default();

    assert_eq!(
        window.bucket_of(Snowflake::new(-5)),
        Err(BucketError::MalformedIdentifier(-5))
    );
}

#[test]
fn test_history_walks_back_to_channel_creation() {
    let (clock, generator) = manual_generator(2 * DAY_MS);
    let messages = MessageService::new(Arc::clone(&generator), BucketWindow::new(DAY_MS).unwrap());

    let channel = generator.generate();
    clock.advance(3 * DAY_MS);
    let first = messages.new_message_key(channel).unwrap();
    clock.advance(DAY_MS);
    let second = messages.new_message_key(channel).unwrap();

    assert_eq!(first.bucket, BucketId(5));
    assert_eq!(second.bucket, BucketId(6));

    let all: Vec<_> = messages.history_buckets(channel, None).unwrap().collect();
    assert_eq!(all, (2..=6).rev().map(BucketId).collect::<Vec<_>>());

    let older: Vec<_> = messages
        .history_buckets(channel, Some(first.message_id))
        .unwrap()
        .collect();
    assert_eq!(older, vec![BucketId(5), BucketId(4), BucketId(3), BucketId(2)]);
}

#[test]
fn test_history_before_channel_is_empty() {
    let window = BucketWindow::new(DAY_MS).unwrap();
    let channel = Snowflake::from_parts(5 * DAY_MS, 0, 0, 0);
    let cursor = Snowflake::from_parts(2 * DAY_MS, 0, 0, 0);

    let range = window.history(channel, cursor).unwrap();
    assert_eq!(range.len(), 0);
    assert_eq!(range.count(), 0);
}

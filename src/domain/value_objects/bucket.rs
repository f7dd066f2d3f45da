//! Message bucket derivation.
//!
//! Messages are partitioned by channel and by a coarse time window derived
//! from the Snowflake's embedded timestamp. A bucket keeps any single
//! partition bounded in size.
//!
//! The window width is a deployment-wide constant: it must be identical at
//! write time and at query time, otherwise stored history can no longer be
//! located.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::snowflake::{Snowflake, MAX_TIMESTAMP_DELTA, TIMESTAMP_SHIFT};

/// Default bucket width: 10 days in milliseconds.
pub const DEFAULT_BUCKET_WINDOW_MS: u64 = 1000 * 60 * 60 * 24 * 10;

/// Bucket derivation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BucketError {
    #[error("Malformed identifier: {0}")]
    MalformedIdentifier(i64),

    #[error("Bucket window must be greater than zero")]
    InvalidWindow,
}

/// A bucket number (partition key for time-series data).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(pub i64);

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fixed-width time window used to derive buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketWindow {
    window_ms: u64,
}

impl BucketWindow {
    /// Create a window of `window_ms` milliseconds.
    pub fn new(window_ms: u64) -> Result<Self, BucketError> {
        if window_ms == 0 {
            return Err(BucketError::InvalidWindow);
        }
        Ok(Self { window_ms })
    }

    pub const fn window_ms(&self) -> u64 {
        self.window_ms
    }

    /// Bucket containing the given Snowflake.
    pub fn bucket_of(&self, id: Snowflake) -> Result<BucketId, BucketError> {
        if !id.is_valid() {
            return Err(BucketError::MalformedIdentifier(id.as_i64()));
        }
        Ok(self.bucket_at(id.delta_millis()))
    }

    /// Bucket containing a raw timestamp delta (milliseconds since the epoch).
    pub const fn bucket_at(&self, delta_ms: u64) -> BucketId {
        BucketId((delta_ms / self.window_ms) as i64)
    }

    /// Smallest and largest Snowflake whose timestamp falls inside `bucket`.
    ///
    /// Both bounds are clamped to the representable timestamp range.
    pub fn bounds(&self, bucket: BucketId) -> (Snowflake, Snowflake) {
        let start = (bucket.0.max(0) as u64)
            .saturating_mul(self.window_ms)
            .min(MAX_TIMESTAMP_DELTA);
        let end = start
            .saturating_add(self.window_ms - 1)
            .min(MAX_TIMESTAMP_DELTA);

        let low = Snowflake::new((start << TIMESTAMP_SHIFT) as i64);
        let high = Snowflake::new(((end << TIMESTAMP_SHIFT) | ((1 << TIMESTAMP_SHIFT) - 1)) as i64);
        (low, high)
    }

    /// Buckets to scan, newest first, when paginating backward through a
    /// channel's history from `before` down to the channel's creation.
    ///
    /// A channel cannot hold messages older than its own Snowflake, so its
    /// creation bucket is the last one visited.
    pub fn history(&self, channel_id: Snowflake, before: Snowflake) -> Result<BucketRange, BucketError> {
        let oldest = self.bucket_of(channel_id)?;
        let newest = self.bucket_of(before)?;
        Ok(BucketRange {
            next: newest.0,
            oldest: oldest.0,
        })
    }
}

impl Default for BucketWindow {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_BUCKET_WINDOW_MS,
        }
    }
}

/// Descending iterator over bucket numbers.
///
/// Empty when the cursor lies before the channel's creation bucket.
#[derive(Debug, Clone)]
pub struct BucketRange {
    next: i64,
    oldest: i64,
}

impl Iterator for BucketRange {
    type Item = BucketId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.oldest {
            return None;
        }
        let current = BucketId(self.next);
        self.next -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = (self.next - self.oldest + 1).max(0) as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for BucketRange {}

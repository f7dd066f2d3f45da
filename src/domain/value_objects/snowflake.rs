//! Discord-style Snowflake ID implementation.
//!
//! Snowflake IDs are 64-bit integers with embedded timestamp information,
//! allowing for time-sortable, globally unique identifiers without coordination.
//!
//! ## Structure
//!
//! ```text
//! 63                         22          17          12          0
//! +---------------------------+-----------+-----------+-----------+
//! |      timestamp delta      |  worker   |  process  |  sequence |
//! |          (42 bits)        |  (5 bits) |  (5 bits) |  (12 bits)|
//! +---------------------------+-----------+-----------+-----------+
//! ```
//!
//! The timestamp is stored as milliseconds since [`DEFAULT_EPOCH`] (or the
//! epoch configured for the deployment). IDs are persisted as signed BIGINT,
//! so the top bit must stay clear: the usable range is 2^41 ms, roughly 69
//! years after the epoch.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Default epoch: 2022-04-07T09:54:31.415Z in milliseconds.
pub const DEFAULT_EPOCH: u64 = 1_649_325_271_415;

/// Bit offset of the timestamp delta.
pub const TIMESTAMP_SHIFT: u32 = 22;
/// Bit offset of the worker ID.
pub const WORKER_SHIFT: u32 = 17;
/// Bit offset of the process ID.
pub const PROCESS_SHIFT: u32 = 12;

/// Width of the worker and process fields.
pub const WORKER_BITS: u32 = 5;
/// Largest worker or process ID that fits the layout.
pub const MAX_WORKER_ID: u8 = (1 << WORKER_BITS) - 1;

/// Width of the sequence field.
pub const SEQUENCE_BITS: u32 = 12;
/// Mask selecting the sequence field.
pub const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
/// Number of distinct sequence values per millisecond per worker.
pub const SEQUENCE_BOUND: u64 = 1 << SEQUENCE_BITS;

/// Largest timestamp delta that keeps the ID positive as an `i64`.
pub const MAX_TIMESTAMP_DELTA: u64 = (1 << (63 - TIMESTAMP_SHIFT)) - 1;

/// A Discord-style Snowflake ID.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(pub i64);

impl Snowflake {
    /// Create a new Snowflake from raw value.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Create a Snowflake from its components.
    ///
    /// `delta_ms` is milliseconds since the epoch, not a Unix timestamp.
    /// Components wider than their field are truncated.
    pub const fn from_parts(delta_ms: u64, worker_id: u8, process_id: u8, sequence: u16) -> Self {
        let ts = (delta_ms & MAX_TIMESTAMP_DELTA) << TIMESTAMP_SHIFT;
        let worker = ((worker_id as u64) & MAX_WORKER_ID as u64) << WORKER_SHIFT;
        let process = ((process_id as u64) & MAX_WORKER_ID as u64) << PROCESS_SHIFT;
        let seq = (sequence as u64) & SEQUENCE_MASK;

        Self((ts | worker | process | seq) as i64)
    }

    /// Milliseconds between the epoch and the creation of this ID.
    pub const fn delta_millis(&self) -> u64 {
        (self.0 as u64) >> TIMESTAMP_SHIFT
    }

    /// Unix timestamp in milliseconds, given the epoch the ID was minted with.
    pub const fn unix_millis(&self, epoch: u64) -> u64 {
        self.delta_millis() + epoch
    }

    /// Get the creation time as a DateTime.
    pub fn created_at(&self, epoch: u64) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.unix_millis(epoch) as i64).single()
    }

    /// Extract the worker ID from this Snowflake.
    pub const fn worker_id(&self) -> u8 {
        ((self.0 as u64 >> WORKER_SHIFT) & MAX_WORKER_ID as u64) as u8
    }

    /// Extract the process ID from this Snowflake.
    pub const fn process_id(&self) -> u8 {
        ((self.0 as u64 >> PROCESS_SHIFT) & MAX_WORKER_ID as u64) as u8
    }

    /// Extract the sequence number from this Snowflake.
    pub const fn sequence(&self) -> u16 {
        (self.0 as u64 & SEQUENCE_MASK) as u16
    }

    /// Get the raw i64 value.
    pub const fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whether the raw value can have been produced by a generator.
    pub const fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Snowflake {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<i64> for Snowflake {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Snowflake> for i64 {
    fn from(snowflake: Snowflake) -> Self {
        snowflake.0
    }
}

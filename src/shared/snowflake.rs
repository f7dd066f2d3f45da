//! Snowflake ID Generator
//!
//! Twitter-style unique ID generation. One generator instance owns its
//! sequence counter; uniqueness across processes relies on every process
//! being assigned a distinct [`WorkerIdentity`].
//!
//! Clock regressions are absorbed by holding the last used timestamp:
//! IDs keep increasing through the sequence field until the clock catches
//! up. If the sequence runs out while the clock is still behind, the held
//! timestamp moves forward by one millisecond, so IDs stay strictly
//! increasing however long the regression lasts.
//!
//! With a healthy clock, more than [`SEQUENCE_BOUND`] IDs requested within
//! one millisecond wrap the sequence and duplicates become possible; this
//! is a limit of the layout and is counted, not prevented.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    Snowflake, MAX_TIMESTAMP_DELTA, MAX_WORKER_ID, SEQUENCE_BOUND, SEQUENCE_MASK,
};
use crate::infrastructure::metrics;

/// Snowflake generator errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeError {
    #[error("{field} {value} exceeds the maximum of {max}")]
    WorkerIdOutOfRange { field: &'static str, value: u64, max: u64 },

    #[error("Clock reads {now} ms, before the epoch {epoch} ms")]
    ClockBeforeEpoch { now: u64, epoch: u64 },

    #[error("Epoch {epoch} ms is too old: timestamp delta no longer fits in the ID")]
    EpochExhausted { epoch: u64 },
}

/// Source of wall-clock time in Unix milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> u64;
}

/// Wall clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        // Before 1970 is clamped to zero; construction rejects it anyway.
        Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Manually driven clock for simulations and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now_millis: u64) -> Self {
        Self {
            now: AtomicU64::new(now_millis),
        }
    }

    pub fn set(&self, now_millis: u64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// Worker and process identifiers embedded in every generated ID.
///
/// Assigned by the deployment; two live generators must never share one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkerIdentity {
    worker_id: u8,
    process_id: u8,
}

impl WorkerIdentity {
    /// Create an identity from its two 5-bit parts.
    pub fn new(worker_id: u8, process_id: u8) -> Result<Self, SnowflakeError> {
        check_range("worker_id", worker_id as u64, MAX_WORKER_ID as u64)?;
        check_range("process_id", process_id as u64, MAX_WORKER_ID as u64)?;
        Ok(Self {
            worker_id,
            process_id,
        })
    }

    /// Split a 10-bit machine ID: high 5 bits worker, low 5 bits process.
    pub fn from_machine_id(machine_id: u16) -> Result<Self, SnowflakeError> {
        let max = ((MAX_WORKER_ID as u64) << 5) | MAX_WORKER_ID as u64;
        check_range("machine_id", machine_id as u64, max)?;
        Self::new((machine_id >> 5) as u8, (machine_id & 0x1F) as u8)
    }

    pub const fn worker_id(&self) -> u8 {
        self.worker_id
    }

    pub const fn process_id(&self) -> u8 {
        self.process_id
    }

    /// The combined 10-bit machine ID.
    pub const fn machine_id(&self) -> u16 {
        ((self.worker_id as u16) << 5) | self.process_id as u16
    }
}

fn check_range(field: &'static str, value: u64, max: u64) -> Result<(), SnowflakeError> {
    if value > max {
        return Err(SnowflakeError::WorkerIdOutOfRange { field, value, max });
    }
    Ok(())
}

#[derive(Debug)]
struct GeneratorState {
    /// Unix milliseconds used for the most recent ID.
    last_timestamp: u64,
    /// Sequence value handed out by the next call.
    sequence: u64,
}

/// Snowflake ID generator.
///
/// Share one instance per worker identity, e.g. as `Arc<SnowflakeGenerator>`.
pub struct SnowflakeGenerator<C: Clock = SystemClock> {
    epoch: u64,
    identity: WorkerIdentity,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl SnowflakeGenerator<SystemClock> {
    /// Create a generator reading the system clock.
    pub fn with_system_clock(epoch: u64, identity: WorkerIdentity) -> Result<Self, SnowflakeError> {
        Self::new(epoch, identity, SystemClock)
    }
}

impl<C: Clock> SnowflakeGenerator<C> {
    /// Create a new snowflake generator.
    ///
    /// # Errors
    ///
    /// Fails if the clock reads before `epoch`, or so far after it that the
    /// timestamp no longer fits the layout.
    pub fn new(epoch: u64, identity: WorkerIdentity, clock: C) -> Result<Self, SnowflakeError> {
        let now = clock.now_millis();
        if now < epoch {
            return Err(SnowflakeError::ClockBeforeEpoch { now, epoch });
        }
        if now - epoch > MAX_TIMESTAMP_DELTA {
            return Err(SnowflakeError::EpochExhausted { epoch });
        }

        tracing::debug!(
            epoch,
            worker_id = identity.worker_id(),
            process_id = identity.process_id(),
            "Snowflake generator created"
        );

        Ok(Self {
            epoch,
            identity,
            clock,
            state: Mutex::new(GeneratorState {
                last_timestamp: now,
                sequence: 0,
            }),
        })
    }

    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    pub const fn identity(&self) -> WorkerIdentity {
        self.identity
    }

    /// Generate a new snowflake ID.
    pub fn generate(&self) -> Snowflake {
        let mut state = self.state.lock();
        self.next_locked(&mut state)
    }

    /// Generate `count` IDs under a single lock acquisition.
    pub fn generate_many(&self, count: usize) -> Vec<Snowflake> {
        let mut state = self.state.lock();
        (0..count).map(|_| self.next_locked(&mut state)).collect()
    }

    fn next_locked(&self, state: &mut GeneratorState) -> Snowflake {
        let now = self.clock.now_millis();

        let behind = now < state.last_timestamp;
        if now > state.last_timestamp {
            state.last_timestamp = now;
            state.sequence = 0;
        } else if behind {
            tracing::warn!(
                now,
                last_timestamp = state.last_timestamp,
                "Clock moved backwards, holding last timestamp"
            );
            metrics::record_clock_regression();
        }

        let timestamp = state.last_timestamp;
        let sequence = state.sequence;
        state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
        if state.sequence == 0 {
            if behind {
                // The held millisecond is used up; continue in the next one.
                state.last_timestamp += 1;
                tracing::debug!(
                    now,
                    timestamp = state.last_timestamp,
                    "Sequence exhausted while clock is behind, moving held timestamp forward"
                );
            } else {
                tracing::debug!(
                    timestamp,
                    bound = SEQUENCE_BOUND,
                    "Snowflake sequence wrapped within one millisecond"
                );
                metrics::record_sequence_wrap();
            }
        }

        metrics::record_snowflake_generated();

        // timestamp >= epoch: construction checked it and it never decreases.
        Snowflake::from_parts(
            timestamp - self.epoch,
            self.identity.worker_id(),
            self.identity.process_id(),
            sequence as u16,
        )
    }
}

impl<C: Clock> std::fmt::Debug for SnowflakeGenerator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("epoch", &self.epoch)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

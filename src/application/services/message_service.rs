//! Message Service
//!
//! Computes the storage keys of chat messages: every new message gets a
//! Snowflake and the bucket it is partitioned under, and history reads get
//! the list of buckets to scan.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::{BucketError, BucketId, BucketRange, BucketWindow, Snowflake};
use crate::shared::snowflake::{Clock, SnowflakeGenerator, SystemClock};

/// Primary key of a stored message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MessageKey {
    pub channel_id: Snowflake,
    pub bucket: BucketId,
    pub message_id: Snowflake,
}

/// Message key service
pub struct MessageService<C: Clock = SystemClock> {
    id_generator: Arc<SnowflakeGenerator<C>>,
    window: BucketWindow,
}

impl<C: Clock> MessageService<C> {
    pub fn new(id_generator: Arc<SnowflakeGenerator<C>>, window: BucketWindow) -> Self {
        Self { id_generator, window }
    }

    pub fn window(&self) -> BucketWindow {
        self.window
    }

    /// Allocate the key for a new message in `channel_id`.
    pub fn new_message_key(&self, channel_id: Snowflake) -> Result<MessageKey, BucketError> {
        let message_id = self.id_generator.generate();
        let bucket = self.window.bucket_of(message_id)?;

        tracing::trace!(%channel_id, %message_id, %bucket, "Message key allocated");

        Ok(MessageKey {
            channel_id,
            bucket,
            message_id,
        })
    }

    /// Buckets to scan, newest first, for messages older than `before`.
    ///
    /// Without a cursor the scan starts from the bucket of a freshly
    /// generated ID, i.e. the current bucket.
    pub fn history_buckets(
        &self,
        channel_id: Snowflake,
        before: Option<Snowflake>,
    ) -> Result<BucketRange, BucketError> {
        let cursor = match before {
            Some(id) => id,
            None => self.id_generator.generate(),
        };
        self.window.history(channel_id, cursor)
    }
}

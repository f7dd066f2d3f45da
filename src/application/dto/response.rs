//! Response DTOs
//!
//! Data structures for response bodies. IDs and 64-bit masks are
//! serialized as strings so JavaScript clients do not lose precision.

use serde::Serialize;

use crate::domain::{BucketError, BucketWindow, Permissions, Snowflake};

/// A decoded Snowflake
#[derive(Debug, Serialize)]
pub struct SnowflakeResponse {
    pub id: String,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub worker_id: u8,
    pub process_id: u8,
    pub sequence: u16,
    pub bucket: i64,
}

impl SnowflakeResponse {
    pub fn new(id: Snowflake, epoch: u64, window: &BucketWindow) -> Result<Self, BucketError> {
        let bucket = window.bucket_of(id)?;
        Ok(Self {
            id: id.to_string(),
            timestamp: id.unix_millis(epoch),
            created_at: id.created_at(epoch).map(|t| t.to_rfc3339()),
            worker_id: id.worker_id(),
            process_id: id.process_id(),
            sequence: id.sequence(),
            bucket: bucket.0,
        })
    }
}

/// A permission mask with its flag names
#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    pub bits: String,
    pub names: Vec<&'static str>,
}

impl From<Permissions> for PermissionsResponse {
    fn from(perms: Permissions) -> Self {
        Self {
            bits: perms.bits().to_string(),
            names: perms.names(),
        }
    }
}

/// Outcome of a permission check
#[derive(Debug, Serialize)]
pub struct AccessCheckResponse {
    pub allowed: bool,
    pub effective: PermissionsResponse,
}

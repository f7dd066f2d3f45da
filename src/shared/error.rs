//! Application Error Types
//!
//! Centralized error type aggregating the component errors, with stable
//! numeric codes for machine-readable output.

use serde::Serialize;

use crate::application::services::AccessError;
use crate::domain::services::PermissionError;
use crate::domain::BucketError;
use crate::shared::snowflake::SnowflakeError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Snowflake error: {0}")]
    Snowflake(#[from] SnowflakeError),

    #[error("Bucket error: {0}")]
    Bucket(#[from] BucketError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl AppError {
    /// Stable numeric error code.
    pub fn code(&self) -> u16 {
        match self {
            AppError::Internal(_) => 10000,
            AppError::BadRequest(_) => 10002,
            AppError::Forbidden(_) => 10004,
            AppError::Bucket(_) => 10007,
            AppError::Config(_) => 10010,
            AppError::Snowflake(_) => 10011,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        if let AppError::Internal(msg) = self {
            tracing::error!("Internal error: {}", msg);
        }
        ErrorResponse {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl From<PermissionError> for AppError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::Forbidden => AppError::Forbidden("missing permissions".into()),
            PermissionError::HierarchyViolation { .. } => AppError::Forbidden(err.to_string()),
            PermissionError::UnknownRole(_) => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Forbidden => AppError::Forbidden("missing permissions".into()),
            AccessError::UnknownPermission(_) => AppError::BadRequest(err.to_string()),
            AccessError::RoleUpdate(inner) => inner.into(),
        }
    }
}

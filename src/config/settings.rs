//! Application settings and configuration structures.

use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::domain::services::RoleSelection;
use crate::domain::{BucketWindow, DEFAULT_BUCKET_WINDOW_MS, DEFAULT_EPOCH, MAX_WORKER_ID};
use crate::shared::snowflake::{SnowflakeError, WorkerIdentity};

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// Message bucket settings
    pub bucket: BucketSettings,

    /// Permission resolution settings
    pub permissions: PermissionSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Snowflake ID generator configuration.
///
/// `worker_id` and `process_id` must be unique per running generator;
/// assigning them is the deployment's job.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Worker ID (0-31)
    pub worker_id: u8,

    /// Process ID (0-31)
    pub process_id: u8,

    /// Custom epoch timestamp in milliseconds. Never change it once IDs exist.
    pub epoch: u64,
}

/// Message bucket configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BucketSettings {
    /// Bucket width in milliseconds. Must match between writers and readers.
    pub window_ms: u64,
}

/// Permission resolution configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionSettings {
    /// Which role's mask applies to members holding several roles
    pub role_selection: RoleSelection,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. Built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed, or
    /// if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SNOWFLAKE__WORKER_ID=3 -> snowflake.worker_id = 3
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("snowflake.worker_id", std::env::var("SNOWFLAKE_WORKER_ID").ok())?
            .set_override_option("snowflake.process_id", std::env::var("SNOWFLAKE_PROCESS_ID").ok())?
            .set_override_option("snowflake.epoch", std::env::var("SNOWFLAKE_EPOCH").ok())?
            .set_override_option("bucket.window_ms", std::env::var("BUCKET_WINDOW_MS").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validated())
    }

    /// Settings built only from defaults, without touching files or the
    /// environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("development")?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validated())
    }

    fn builder(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("snowflake.worker_id", 0)?
            .set_default("snowflake.process_id", 0)?
            .set_default("snowflake.epoch", DEFAULT_EPOCH)?
            .set_default("bucket.window_ms", DEFAULT_BUCKET_WINDOW_MS)?
            .set_default("permissions.role_selection", "highest_position")
    }

    /// Reject values the core cannot run with.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.snowflake.worker_id > MAX_WORKER_ID || self.snowflake.process_id > MAX_WORKER_ID {
            return Err(ConfigError::Message(format!(
                "snowflake worker_id and process_id must be at most {}. Got {} and {}",
                MAX_WORKER_ID, self.snowflake.worker_id, self.snowflake.process_id
            )));
        }
        if self.bucket.window_ms == 0 {
            return Err(ConfigError::Message("bucket.window_ms must be greater than zero".into()));
        }
        Ok(self)
    }
}

impl SnowflakeSettings {
    /// The worker identity described by these settings.
    pub fn identity(&self) -> Result<WorkerIdentity, SnowflakeError> {
        WorkerIdentity::new(self.worker_id, self.process_id)
    }
}

impl BucketSettings {
    /// The bucket window described by these settings.
    pub fn window(&self) -> Result<BucketWindow, crate::domain::BucketError> {
        BucketWindow::new(self.window_ms)
    }
}

//! # Configuration Module
//!
//! This module handles application configuration loading and management.
//! Configuration can be loaded from:
//! - Environment variables (prefixed with APP__, plus SNOWFLAKE_WORKER_ID,
//!   SNOWFLAKE_PROCESS_ID, SNOWFLAKE_EPOCH and BUCKET_WINDOW_MS)
//! - Configuration files (config/default.toml, config/{environment}.toml)
//! - .env files (via dotenvy)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chat_core::config::Settings;
//!
//! let settings = Settings::load()?;
//! println!("Worker {} / process {}", settings.snowflake.worker_id, settings.snowflake.process_id);
//! ```

mod settings;

pub use settings::*;

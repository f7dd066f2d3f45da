//! Application Startup
//!
//! Builds the shared components from settings.

use std::sync::Arc;

use crate::application::services::{AccessService, MessageService};
use crate::config::Settings;
use crate::shared::error::AppError;
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across callers
#[derive(Clone)]
pub struct AppState {
    pub snowflake: Arc<SnowflakeGenerator>,
    pub messages: Arc<MessageService>,
    pub access: AccessService,
    pub settings: Arc<Settings>,
}

/// Application instance
pub struct Application {
    state: AppState,
}

impl Application {
    /// Build the application from settings
    pub fn build(settings: Settings) -> Result<Self, AppError> {
        let identity = settings.snowflake.identity()?;
        let window = settings.bucket.window()?;

        // Create snowflake generator
        let snowflake = Arc::new(SnowflakeGenerator::with_system_clock(
            settings.snowflake.epoch,
            identity,
        )?);
        tracing::info!(
            worker_id = identity.worker_id(),
            process_id = identity.process_id(),
            epoch = settings.snowflake.epoch,
            "Snowflake generator ready"
        );

        let messages = Arc::new(MessageService::new(Arc::clone(&snowflake), window));
        let access = AccessService::new(settings.permissions.role_selection);
        tracing::info!(
            window_ms = window.window_ms(),
            role_selection = ?settings.permissions.role_selection,
            "Message buckets and permission resolver ready"
        );

        let state = AppState {
            snowflake,
            messages,
            access,
            settings: Arc::new(settings),
        };

        Ok(Self { state })
    }

    /// Get the shared state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

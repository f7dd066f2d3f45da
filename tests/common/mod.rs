//! Common Test Utilities
//!
//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chat_core::domain::{PermissionOverwrite, Permissions, Role, Snowflake, DEFAULT_EPOCH};
use chat_core::shared::snowflake::{ManualClock, SnowflakeGenerator, WorkerIdentity};

pub const GUILD_ID: Snowflake = Snowflake::new(1_000);
pub const CHANNEL_ID: Snowflake = Snowflake::new(2_000);
pub const MEMBER_ID: Snowflake = Snowflake::new(3_000);

pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// A generator driven by a manual clock starting `offset_ms` after the epoch.
pub fn manual_generator(offset_ms: u64) -> (Arc<ManualClock>, Arc<SnowflakeGenerator<Arc<ManualClock>>>) {
    let clock = Arc::new(ManualClock::new(DEFAULT_EPOCH + offset_ms));
    let generator = SnowflakeGenerator::new(
        DEFAULT_EPOCH,
        WorkerIdentity::new(1, 2).unwrap(),
        Arc::clone(&clock),
    )
    .unwrap();
    (clock, Arc::new(generator))
}

/// A generator on the system clock.
pub fn system_generator(worker_id: u8, process_id: u8) -> Arc<SnowflakeGenerator> {
    Arc::new(
        SnowflakeGenerator::with_system_clock(
            DEFAULT_EPOCH,
            WorkerIdentity::new(worker_id, process_id).unwrap(),
        )
        .unwrap(),
    )
}

pub fn role(id: i64, position: i32, permissions: i64) -> Role {
    Role::new(
        Snowflake::new(id),
        GUILD_ID,
        format!("role-{}", id),
        Permissions::new(permissions),
        position,
    )
}

pub fn member_overwrite(allow: i64, deny: i64) -> PermissionOverwrite {
    PermissionOverwrite::new(CHANNEL_ID, MEMBER_ID, allow, deny)
}

//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **Snowflake**: Discord-style unique ID with embedded timestamp
//! - **Permissions**: 64-bit permission bitfield with helper methods
//! - **BucketWindow**: Time window deriving message partition keys from Snowflakes

mod bucket;
mod permissions;
mod snowflake;

pub use bucket::*;
pub use permissions::*;
pub use snowflake::*;

//! # Domain Layer
//!
//! The domain layer contains the core business logic of the chat server.
//! It is independent of any external frameworks or infrastructure concerns.
//!
//! ## Structure
//!
//! - **entities**: Plain data records (Role, Member, PermissionOverwrite)
//! - **value_objects**: Immutable value types (Snowflake, Permissions, BucketWindow)
//! - **services**: Domain services for permission resolution
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Pure functions over plain data; no I/O

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;

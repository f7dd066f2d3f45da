//! Application Services
//!
//! Services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **AccessService**: Channel permission checks and member role updates
//! - **MessageService**: Message IDs, buckets and history scan ranges

pub mod access_service;
pub mod message_service;

// Re-export access service types
pub use access_service::{AccessError, AccessService};

// Re-export message service types
pub use message_service::{MessageKey, MessageService};

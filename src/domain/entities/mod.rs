//! # Domain Entities
//!
//! Plain data records supplied by the persistence layer.
//!
//! - **Role**: A set of permissions assignable to guild members, ranked by position
//! - **Member**: A user's membership in a specific guild
//! - **PermissionOverwrite**: A per-member allow/deny exception on a channel

mod member;
mod overwrite;
mod role;

pub use member::Member;
pub use overwrite::PermissionOverwrite;
pub use role::Role;

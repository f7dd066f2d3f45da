//! Role entity.
//!
//! Roles are loaded by the persistence layer and handed to the permission
//! resolver as plain records.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Permissions, Snowflake};

/// Represents a role in a guild.
///
/// Roles define permissions and can be assigned to members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Snowflake ID (primary key)
    pub id: Snowflake,

    /// Guild ID this role belongs to
    pub guild_id: Snowflake,

    /// Role name (up to 100 characters)
    pub name: String,

    /// Permission bitfield (64-bit flags)
    pub permissions: Permissions,

    /// Position in the role hierarchy (higher = more priority)
    pub position: i32,
}

impl Role {
    /// Create a role with the given permissions and position.
    pub fn new(
        id: Snowflake,
        guild_id: Snowflake,
        name: impl Into<String>,
        permissions: Permissions,
        position: i32,
    ) -> Self {
        Self {
            id,
            guild_id,
            name: name.into(),
            permissions,
            position,
        }
    }

    /// Whether this role outranks `other` in the hierarchy.
    pub fn outranks(&self, other: &Role) -> bool {
        self.position > other.position
    }
}

impl Default for Role {
    fn default() -> Self {
        Self {
            id: Snowflake::default(),
            guild_id: Snowflake::default(),
            name: "new role".to_string(),
            permissions: Permissions::empty(),
            position: 0,
        }
    }
}

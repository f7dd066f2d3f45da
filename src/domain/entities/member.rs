//! Guild Member entity.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Snowflake;

use super::role::Role;

/// Represents a user's membership in a guild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Guild ID
    pub guild_id: Snowflake,

    /// User ID
    pub user_id: Snowflake,

    /// Whether this member owns the guild
    #[serde(default)]
    pub owner: bool,

    /// IDs of roles assigned to this member, in assignment order
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

impl Member {
    /// Create a new member with no roles.
    pub fn new(guild_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            guild_id,
            user_id,
            owner: false,
            roles: Vec::new(),
        }
    }

    /// Look up this member's role records, keeping the member's own order.
    ///
    /// Role IDs missing from `guild_roles` are skipped.
    pub fn resolve_roles(&self, guild_roles: &[Role]) -> Vec<Role> {
        self.roles
            .iter()
            .filter_map(|id| guild_roles.iter().find(|r| r.id == *id))
            .cloned()
            .collect()
    }
}

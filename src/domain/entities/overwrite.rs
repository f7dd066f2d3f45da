//! Channel permission overwrite entity.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Permissions, Snowflake};

/// A per-member allow/deny exception on a single channel.
///
/// `allow` and `deny` should never share a bit. When stored data does,
/// the deny bit wins (see [`Permissions::apply_overwrites`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Channel ID this overwrite belongs to
    pub channel_id: Snowflake,

    /// Member (user) ID the overwrite targets
    pub target_id: Snowflake,

    /// Allowed permissions bitfield
    pub allow: Permissions,

    /// Denied permissions bitfield
    pub deny: Permissions,
}

impl PermissionOverwrite {
    pub fn new(channel_id: Snowflake, target_id: Snowflake, allow: i64, deny: i64) -> Self {
        Self {
            channel_id,
            target_id,
            allow: Permissions::new(allow),
            deny: Permissions::new(deny),
        }
    }

    /// Bits set in both `allow` and `deny`.
    pub fn conflicts(&self) -> Permissions {
        self.allow & self.deny
    }

    /// Apply this overwrite on top of `base`.
    pub fn apply(&self, base: Permissions) -> Permissions {
        Permissions::new(Permissions::apply_overwrites(
            base.bits(),
            self.allow.bits(),
            self.deny.bits(),
        ))
    }
}

//! Permission calculation domain service.
//!
//! Resolution runs in a fixed order and stops at the first rule that
//! decides the outcome:
//!
//! 1. The guild owner is granted everything.
//! 2. The member's role mask is taken from a single role (see
//!    [`RoleSelection`]), or from the guild base mask when the member holds
//!    no roles.
//! 3. A role mask carrying ADMINISTRATOR grants everything, overwrites included.
//! 4. A channel overwrite for the member is applied per bit: deny, then
//!    allow, then the role mask.
//!
//! The resolver is pure. Loading roles and overwrites is the caller's job.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{PermissionOverwrite, Role};
use crate::domain::value_objects::{Permissions, Snowflake};

/// How the role mask is chosen when a member holds several roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSelection {
    /// The first role in the member's role list.
    First,
    /// The role with the highest position; ties go to the earliest listed role.
    #[default]
    HighestPosition,
}

impl std::str::FromStr for RoleSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first" => Ok(Self::First),
            "highest_position" | "highest" => Ok(Self::HighestPosition),
            _ => Err(format!("unknown role selection: {}", s)),
        }
    }
}

/// Everything the resolver needs to know about one member for one check.
#[derive(Debug, Clone, Copy)]
pub struct MemberContext<'a> {
    pub is_owner: bool,
    pub roles: &'a [Role],
    pub overwrite: Option<&'a PermissionOverwrite>,
}

impl<'a> MemberContext<'a> {
    pub fn new(is_owner: bool, roles: &'a [Role], overwrite: Option<&'a PermissionOverwrite>) -> Self {
        Self {
            is_owner,
            roles,
            overwrite,
        }
    }

    /// A non-owner member with the given roles and no overwrite.
    pub fn with_roles(roles: &'a [Role]) -> Self {
        Self::new(false, roles, None)
    }
}

/// Permission and role-management errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    #[error("Permission denied")]
    Forbidden,

    #[error("Unknown role: {0}")]
    UnknownRole(Snowflake),

    #[error("Role hierarchy violation: role {role} at position {position} is not below the actor's highest role")]
    HierarchyViolation { role: Snowflake, position: i32 },
}

/// Domain service for calculating and validating permissions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionResolver {
    selection: RoleSelection,
}

impl PermissionResolver {
    pub const fn new(selection: RoleSelection) -> Self {
        Self { selection }
    }

    pub const fn selection(&self) -> RoleSelection {
        self.selection
    }

    /// Pick the single role whose mask applies to the member.
    pub fn select_role<'r>(&self, roles: &'r [Role]) -> Option<&'r Role> {
        match self.selection {
            RoleSelection::First => roles.first(),
            RoleSelection::HighestPosition => roles.iter().fold(None, |best: Option<&Role>, role| {
                match best {
                    Some(b) if b.position >= role.position => Some(b),
                    _ => Some(role),
                }
            }),
        }
    }

    /// The member's role-derived mask, before overwrites.
    pub fn role_mask(&self, member: &MemberContext<'_>, guild_base: Permissions) -> Permissions {
        self.select_role(member.roles)
            .map(|role| role.permissions)
            .unwrap_or(guild_base)
    }

    /// The fully resolved permission set for a member in a channel.
    ///
    /// Owners and administrators get [`Permissions::ALL`].
    pub fn effective_permissions(&self, member: &MemberContext<'_>, guild_base: Permissions) -> Permissions {
        if member.is_owner {
            return Permissions::all();
        }

        let role_mask = self.role_mask(member, guild_base);
        if role_mask.is_admin() {
            return Permissions::all();
        }

        match member.overwrite {
            Some(overwrite) => overwrite.apply(role_mask),
            None => role_mask,
        }
    }

    /// Check a single permission (every bit of `permission` must resolve to allow).
    pub fn has_permission(&self, member: &MemberContext<'_>, guild_base: Permissions, permission: i64) -> bool {
        if member.is_owner {
            return true;
        }

        let role_mask = self.role_mask(member, guild_base);
        if role_mask.is_admin() {
            return true;
        }

        let effective = match member.overwrite {
            Some(overwrite) => overwrite.apply(role_mask),
            None => role_mask,
        };
        effective.contains(permission)
    }

    /// Check that every requested permission resolves to allow.
    ///
    /// An empty request is trivially satisfied.
    pub fn has_all(&self, member: &MemberContext<'_>, guild_base: Permissions, requested: &[i64]) -> bool {
        requested
            .iter()
            .all(|p| self.has_permission(member, guild_base, *p))
    }

    /// Like [`has_all`](Self::has_all), but returns `Forbidden` on denial.
    pub fn check(
        &self,
        member: &MemberContext<'_>,
        guild_base: Permissions,
        requested: &[i64],
    ) -> Result<(), PermissionError> {
        if self.has_all(member, guild_base, requested) {
            Ok(())
        } else {
            Err(PermissionError::Forbidden)
        }
    }

    /// The highest-positioned role among `roles`, if any.
    pub fn highest_role(roles: &[Role]) -> Option<&Role> {
        roles.iter().max_by_key(|r| r.position)
    }

    /// Check that `actor` may add or remove every role in `changed`.
    ///
    /// Each changed role must sit strictly below the actor's highest role.
    /// An actor without roles cannot change any role; the owner always can.
    pub fn can_manage_roles(actor: &MemberContext<'_>, changed: &[Role]) -> Result<(), PermissionError> {
        if actor.is_owner {
            return Ok(());
        }

        let actor_highest = Self::highest_role(actor.roles);
        for role in changed {
            if !actor_highest.is_some_and(|highest| highest.outranks(role)) {
                return Err(PermissionError::HierarchyViolation {
                    role: role.id,
                    position: role.position,
                });
            }
        }
        Ok(())
    }

    /// Authorize replacing a member's role set with `requested`.
    ///
    /// The actor needs MANAGE_ROLES, every requested role must belong to the
    /// guild, and each role being added or removed must pass the hierarchy
    /// guard. Returns the new role set, deduplicated and sorted.
    ///
    /// Role management is guild-wide: any channel overwrite on `actor` is
    /// ignored for the MANAGE_ROLES check.
    pub fn authorize_role_update(
        &self,
        actor: &MemberContext<'_>,
        guild_base: Permissions,
        guild_roles: &[Role],
        current: &[Snowflake],
        requested: &[Snowflake],
    ) -> Result<Vec<Snowflake>, PermissionError> {
        let guild_actor = MemberContext {
            overwrite: None,
            ..*actor
        };
        if !self.has_permission(&guild_actor, guild_base, Permissions::MANAGE_ROLES) {
            return Err(PermissionError::Forbidden);
        }

        let find = |id: &Snowflake| guild_roles.iter().find(|r| r.id == *id);

        let requested: BTreeSet<Snowflake> = requested.iter().copied().collect();
        if let Some(unknown) = requested.iter().find(|id| find(id).is_none()) {
            return Err(PermissionError::UnknownRole(*unknown));
        }

        let current: BTreeSet<Snowflake> = current.iter().copied().collect();
        // Removed roles that no longer exist in the guild are dropped unchecked.
        let changed: Vec<Role> = requested
            .symmetric_difference(&current)
            .filter_map(|id| find(id).cloned())
            .collect();

        Self::can_manage_roles(actor, &changed)?;

        Ok(requested.into_iter().collect())
    }
}

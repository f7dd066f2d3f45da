//! Access Service
//!
//! Wraps the permission resolver for request handlers: resolves permission
//! names, logs decisions and records metrics.

use crate::domain::services::{MemberContext, PermissionError, PermissionResolver, RoleSelection};
use crate::domain::{Permissions, Role, Snowflake};
use crate::infrastructure::metrics;

// =============================================================================
// Error Types
// =============================================================================

/// Access service errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("Permission denied")]
    Forbidden,

    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    #[error(transparent)]
    RoleUpdate(PermissionError),
}

impl From<PermissionError> for AccessError {
    fn from(err: PermissionError) -> Self {
        match err {
            PermissionError::Forbidden => AccessError::Forbidden,
            other => AccessError::RoleUpdate(other),
        }
    }
}

// =============================================================================
// Service Implementation
// =============================================================================

/// Permission checks for channel and role operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessService {
    resolver: PermissionResolver,
}

impl AccessService {
    pub fn new(selection: RoleSelection) -> Self {
        Self {
            resolver: PermissionResolver::new(selection),
        }
    }

    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Translate permission names into flags.
    pub fn parse_permissions<S: AsRef<str>>(names: &[S]) -> Result<Vec<i64>, AccessError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Permissions::flag_by_name(name).ok_or_else(|| AccessError::UnknownPermission(name.to_string()))
            })
            .collect()
    }

    /// Require every permission in `requested`; returns the member's effective
    /// permissions on success.
    pub fn check_channel_access(
        &self,
        member: &MemberContext<'_>,
        guild_base: Permissions,
        requested: &[i64],
    ) -> Result<Permissions, AccessError> {
        let effective = self.resolver.effective_permissions(member, guild_base);
        let allowed = self.resolver.has_all(member, guild_base, requested);
        metrics::record_permission_check(allowed);

        if let Some(overwrite) = member.overwrite {
            let conflicts = overwrite.conflicts();
            if conflicts != Permissions::empty() {
                tracing::warn!(
                    channel_id = %overwrite.channel_id,
                    target_id = %overwrite.target_id,
                    conflicting = %conflicts,
                    "Overwrite allows and denies the same permissions; deny wins"
                );
            }
        }

        if !allowed {
            tracing::debug!(
                is_owner = member.is_owner,
                roles = member.roles.len(),
                effective = %effective,
                "Permission check denied"
            );
            return Err(AccessError::Forbidden);
        }

        Ok(effective)
    }

    /// Like [`check_channel_access`](Self::check_channel_access), with
    /// permissions given by name.
    pub fn check_channel_access_by_name<S: AsRef<str>>(
        &self,
        member: &MemberContext<'_>,
        guild_base: Permissions,
        requested: &[S],
    ) -> Result<Permissions, AccessError> {
        let flags = Self::parse_permissions(requested)?;
        self.check_channel_access(member, guild_base, &flags)
    }

    /// Authorize replacing a member's roles; returns the new role set.
    pub fn update_member_roles(
        &self,
        actor: &MemberContext<'_>,
        guild_base: Permissions,
        guild_roles: &[Role],
        current: &[Snowflake],
        requested: &[Snowflake],
    ) -> Result<Vec<Snowflake>, AccessError> {
        match self
            .resolver
            .authorize_role_update(actor, guild_base, guild_roles, current, requested)
        {
            Ok(roles) => {
                tracing::info!(roles = roles.len(), "Member role update authorized");
                Ok(roles)
            }
            Err(err) => {
                tracing::info!(error = %err, "Member role update rejected");
                Err(err.into())
            }
        }
    }
}

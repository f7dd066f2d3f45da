//! Request DTOs
//!
//! Data structures for incoming request bodies.

use serde::Deserialize;

use crate::domain::services::MemberContext;
use crate::domain::{PermissionOverwrite, Permissions, Role};
use crate::shared::error::AppError;

/// A permission check, as assembled by the data-access layer.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessCheckRequest {
    #[serde(default)]
    pub is_owner: bool,

    /// The member's roles, in the member's own order
    #[serde(default)]
    pub roles: Vec<Role>,

    /// The member's overwrite on the target channel, if any
    #[serde(default)]
    pub overwrite: Option<PermissionOverwrite>,

    /// Guild base permissions (used when the member holds no roles)
    pub guild_permissions: Permissions,

    /// Requested permission names (e.g. "send_messages")
    pub requested: Vec<String>,
}

impl AccessCheckRequest {
    /// Parse a request body; malformed input is a bad request.
    pub fn from_json(body: &str) -> Result<Self, AppError> {
        serde_json::from_str(body)
            .map_err(|e| AppError::BadRequest(format!("invalid permission check request: {}", e)))
    }

    /// Borrow the request as a resolver context.
    pub fn member(&self) -> MemberContext<'_> {
        MemberContext::new(self.is_owner, &self.roles, self.overwrite.as_ref())
    }
}

//! Discord-style permission flags.
//!
//! Permissions are represented as a 64-bit bitfield where each bit
//! represents a specific permission. Masks are only ever combined with
//! bitwise operators.
//!
//! Bit positions are those of the masks already stored for guilds and
//! roles. Bits 0-24 follow Discord; from bit 25 on the layout diverges
//! (there is no voice-activity bit, so nickname, role, webhook and emoji
//! management each sit one position lower than in Discord). Bits 7-9 and
//! 19-24 and bit 30 are named but no check in this crate requires them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 64-bit permission bitfield.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub i64);

impl Permissions {
    // General permissions
    /// Allows creation of instant invites
    pub const CREATE_INSTANT_INVITE: i64 = 1 << 0;
    /// Allows kicking members
    pub const KICK_MEMBERS: i64 = 1 << 1;
    /// Allows banning members
    pub const BAN_MEMBERS: i64 = 1 << 2;
    /// Allows all permissions and bypasses channel permission overwrites
    pub const ADMINISTRATOR: i64 = 1 << 3;
    /// Allows management and editing of channels
    pub const MANAGE_CHANNELS: i64 = 1 << 4;
    /// Allows management and editing of the guild
    pub const MANAGE_GUILD: i64 = 1 << 5;
    /// Allows for the addition of reactions to messages
    pub const ADD_REACTIONS: i64 = 1 << 6;
    /// Allows for viewing of audit logs
    pub const VIEW_AUDIT_LOG: i64 = 1 << 7;
    /// Allows for using priority speaker in a voice channel
    pub const PRIORITY_SPEAKER: i64 = 1 << 8;
    /// Allows the user to go live
    pub const STREAM: i64 = 1 << 9;
    /// Allows guild members to view a channel
    pub const VIEW_CHANNEL: i64 = 1 << 10;
    /// Allows for sending messages in a channel
    pub const SEND_MESSAGES: i64 = 1 << 11;
    /// Allows for sending TTS messages
    pub const SEND_TTS_MESSAGES: i64 = 1 << 12;
    /// Allows for deletion of other users messages
    pub const MANAGE_MESSAGES: i64 = 1 << 13;
    /// Links sent by users with this permission will be auto-embedded
    pub const EMBED_LINKS: i64 = 1 << 14;
    /// Allows for uploading images and files
    pub const ATTACH_FILES: i64 = 1 << 15;
    /// Allows for reading of message history
    pub const READ_MESSAGE_HISTORY: i64 = 1 << 16;
    /// Allows for using the @everyone tag
    pub const MENTION_EVERYONE: i64 = 1 << 17;
    /// Allows the usage of custom emojis from other servers
    pub const USE_EXTERNAL_EMOJIS: i64 = 1 << 18;
    /// Allows for viewing guild insights
    pub const VIEW_GUILD_INSIGHTS: i64 = 1 << 19;
    /// Allows for joining of a voice channel
    pub const CONNECT: i64 = 1 << 20;
    /// Allows for speaking in a voice channel
    pub const SPEAK: i64 = 1 << 21;
    /// Allows for muting members in a voice channel
    pub const MUTE_MEMBERS: i64 = 1 << 22;
    /// Allows for deafening of members in a voice channel
    pub const DEAFEN_MEMBERS: i64 = 1 << 23;
    /// Allows for moving of members between voice channels
    pub const MOVE_MEMBERS: i64 = 1 << 24;
    /// Allows for modification of own nickname
    pub const CHANGE_NICKNAME: i64 = 1 << 25;
    /// Allows for modification of other users nicknames
    pub const MANAGE_NICKNAMES: i64 = 1 << 26;
    /// Allows management and editing of roles
    pub const MANAGE_ROLES: i64 = 1 << 27;
    /// Allows management and editing of webhooks
    pub const MANAGE_WEBHOOKS: i64 = 1 << 28;
    /// Allows management and editing of emojis
    pub const MANAGE_EMOJIS: i64 = 1 << 29;
    /// Allows management of scheduled events
    pub const MANAGE_EVENTS: i64 = 1 << 30;

    /// All permissions combined
    pub const ALL: i64 = (1 << 31) - 1;

    /// Default permissions for a new guild
    pub const DEFAULT: i64 = Self::CREATE_INSTANT_INVITE
        | Self::ADD_REACTIONS
        | Self::VIEW_CHANNEL
        | Self::SEND_MESSAGES
        | Self::SEND_TTS_MESSAGES
        | Self::EMBED_LINKS
        | Self::ATTACH_FILES
        | Self::READ_MESSAGE_HISTORY
        | Self::USE_EXTERNAL_EMOJIS
        | Self::CHANGE_NICKNAME;

    /// Wire names of every flag, in bit order.
    pub const NAMES: [(&'static str, i64); 31] = [
        ("create_instant_invite", Self::CREATE_INSTANT_INVITE),
        ("kick_members", Self::KICK_MEMBERS),
        ("ban_members", Self::BAN_MEMBERS),
        ("administrator", Self::ADMINISTRATOR),
        ("manage_channels", Self::MANAGE_CHANNELS),
        ("manage_guild", Self::MANAGE_GUILD),
        ("add_reactions", Self::ADD_REACTIONS),
        ("view_audit_log", Self::VIEW_AUDIT_LOG),
        ("priority_speaker", Self::PRIORITY_SPEAKER),
        ("stream", Self::STREAM),
        ("view_channel", Self::VIEW_CHANNEL),
        ("send_messages", Self::SEND_MESSAGES),
        ("send_tts_messages", Self::SEND_TTS_MESSAGES),
        ("manage_messages", Self::MANAGE_MESSAGES),
        ("embed_links", Self::EMBED_LINKS),
        ("attach_files", Self::ATTACH_FILES),
        ("read_message_history", Self::READ_MESSAGE_HISTORY),
        ("mention_everyone", Self::MENTION_EVERYONE),
        ("use_external_emojis", Self::USE_EXTERNAL_EMOJIS),
        ("view_guild_insights", Self::VIEW_GUILD_INSIGHTS),
        ("connect", Self::CONNECT),
        ("speak", Self::SPEAK),
        ("mute_members", Self::MUTE_MEMBERS),
        ("deafen_members", Self::DEAFEN_MEMBERS),
        ("move_members", Self::MOVE_MEMBERS),
        ("change_nickname", Self::CHANGE_NICKNAME),
        ("manage_nicknames", Self::MANAGE_NICKNAMES),
        ("manage_roles", Self::MANAGE_ROLES),
        ("manage_webhooks", Self::MANAGE_WEBHOOKS),
        ("manage_emojis", Self::MANAGE_EMOJIS),
        ("manage_events", Self::MANAGE_EVENTS),
    ];

    /// Create a new Permissions instance.
    pub const fn new(bits: i64) -> Self {
        Self(bits)
    }

    /// Create empty permissions.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Create permissions with all flags set.
    pub const fn all() -> Self {
        Self(Self::ALL)
    }

    /// Check if every bit of `permission` is set.
    ///
    /// Unlike the resolver this does not treat ADMINISTRATOR specially.
    pub const fn contains(&self, permission: i64) -> bool {
        self.0 & permission == permission
    }

    /// Check if a specific permission is set, with Administrator granting everything.
    pub const fn has(&self, permission: i64) -> bool {
        if self.is_admin() {
            return true;
        }
        self.contains(permission)
    }

    /// Check if administrator permission is set.
    pub const fn is_admin(&self) -> bool {
        self.0 & Self::ADMINISTRATOR != 0
    }

    /// Add a permission.
    pub fn add(&mut self, permission: i64) {
        self.0 |= permission;
    }

    /// Remove a permission.
    pub fn remove(&mut self, permission: i64) {
        self.0 &= !permission;
    }

    /// Combine with another Permissions (union).
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Get intersection with another Permissions.
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Get the raw bits.
    pub const fn bits(&self) -> i64 {
        self.0
    }

    /// Compute effective permissions after applying an overwrite.
    ///
    /// Per bit: denied if set in `deny`, otherwise allowed if set in
    /// `allow`, otherwise inherited from `base`. A bit present in both
    /// `allow` and `deny` is denied.
    pub const fn apply_overwrites(base: i64, allow: i64, deny: i64) -> i64 {
        (base | allow) & !deny
    }

    /// Look up a single flag by its wire name (e.g. `"send_messages"`).
    pub fn flag_by_name(name: &str) -> Option<i64> {
        Self::NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, flag)| *flag)
    }

    /// Names of all flags set in this mask, in bit order.
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(_, flag)| self.0 & flag != 0)
            .map(|(name, _)| *name)
            .collect()
    }
}

impl fmt::Display for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Permissions {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Permissions> for i64 {
    fn from(perms: Permissions) -> Self {
        perms.0
    }
}

impl std::ops::BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for Permissions {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl std::ops::Not for Permissions {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

//! Permission resolution and role management through the public API.

use pretty_assertions::assert_eq;
use test_case::test_case;

use chat_core::application::services::{AccessError, AccessService};
use chat_core::domain::services::{MemberContext, PermissionError, PermissionResolver, RoleSelection};
use chat_core::domain::{Member, Permissions, Snowflake};

use crate::common::{member_overwrite, role, GUILD_ID, MEMBER_ID};

const SEND: i64 = Permissions::SEND_MESSAGES;
const EMBED: i64 = Permissions::EMBED_LINKS;
const MANAGE_ROLES: i64 = Permissions::MANAGE_ROLES;

#[test_case(SEND, 0, 0, SEND, true ; "role grants")]
#[test_case(0, SEND, 0, SEND, true ; "overwrite allows")]
#[test_case(SEND, 0, SEND, SEND, false ; "overwrite denies")]
#[test_case(0, SEND, SEND, SEND, false ; "deny beats allow")]
#[test_case(SEND, 0, EMBED, SEND, true ; "unrelated deny falls through")]
#[test_case(Permissions::ADMINISTRATOR, 0, SEND, SEND, true ; "admin ignores overwrite")]
fn test_single_role_resolution(role_bits: i64, allow: i64, deny: i64, requested: i64, expected: bool) {
    let roles = [role(10, 1, role_bits)];
    let ow = member_overwrite(allow, deny);
    let member = MemberContext::new(false, &roles, Some(&ow));

    let resolver = PermissionResolver::default();
    assert_eq!(resolver.has_permission(&member, Permissions::empty(), requested), expected);
}

#[test]
fn test_member_without_roles_uses_guild_base() {
    let resolver = PermissionResolver::default();
    let member = MemberContext::with_roles(&[]);
    let base = Permissions::new(Permissions::DEFAULT);

    assert!(resolver.has_permission(&member, base, Permissions::VIEW_CHANNEL));
    assert!(!resolver.has_permission(&member, base, Permissions::MANAGE_GUILD));
}

#[test]
fn test_owner_passes_everything() {
    let resolver = PermissionResolver::default();
    let ow = member_overwrite(0, Permissions::ALL);
    let owner = MemberContext::new(true, &[], Some(&ow));

    assert!(resolver.has_all(&owner, Permissions::empty(), &[SEND, MANAGE_ROLES, Permissions::BAN_MEMBERS]));
    assert_eq!(resolver.effective_permissions(&owner, Permissions::empty()), Permissions::all());
}

#[test]
fn test_role_selection_strategies_differ() {
    let roles = [role(1, 1, SEND), role(2, 5, EMBED)];
    let member = MemberContext::with_roles(&roles);

    let first = PermissionResolver::new(RoleSelection::First);
    let highest = PermissionResolver::new(RoleSelection::HighestPosition);

    assert!(first.has_permission(&member, Permissions::empty(), SEND));
    assert!(!first.has_permission(&member, Permissions::empty(), EMBED));
    assert!(highest.has_permission(&member, Permissions::empty(), EMBED));
    assert!(!highest.has_permission(&member, Permissions::empty(), SEND));
}

#[test]
fn test_check_requires_every_requested_permission() {
    let resolver = PermissionResolver::default();
    let roles = [role(1, 1, SEND)];
    let member = MemberContext::with_roles(&roles);

    assert_eq!(resolver.check(&member, Permissions::empty(), &[]), Ok(()));
    assert_eq!(resolver.check(&member, Permissions::empty(), &[SEND]), Ok(()));
    assert_eq!(
        resolver.check(&member, Permissions::empty(), &[SEND, EMBED]),
        Err(PermissionError::Forbidden)
    );
}

#[test]
fn test_access_service_end_to_end() {
    let guild_roles = vec![
        role(1, 1, Permissions::DEFAULT),
        role(2, 3, Permissions::DEFAULT | Permissions::MANAGE_MESSAGES),
    ];
    let mut member = Member::new(GUILD_ID, MEMBER_ID);
    member.roles = vec![Snowflake::new(1), Snowflake::new(2)];
    let roles = member.resolve_roles(&guild_roles);

    let ow = member_overwrite(EMBED, SEND);
    let ctx = MemberContext::new(member.owner, &roles, Some(&ow));
    let service = AccessService::default();

    let effective = service
        .check_channel_access_by_name(&ctx, Permissions::empty(), &["view_channel", "manage_messages", "embed_links"])
        .unwrap();
    assert!(effective.has(EMBED));
    assert!(!effective.has(SEND));

    assert_eq!(
        service.check_channel_access_by_name(&ctx, Permissions::empty(), &["send_messages"]),
        Err(AccessError::Forbidden)
    );
    assert_eq!(
        service.check_channel_access_by_name(&ctx, Permissions::empty(), &["fly"]),
        Err(AccessError::UnknownPermission("fly".into()))
    );
}

#[test]
fn test_role_update_respects_hierarchy() {
    let guild_roles = vec![
        role(1, 1, 0),
        role(2, 2, 0),
        role(3, 3, MANAGE_ROLES),
        role(4, 4, 0),
    ];
    let actor_roles = vec![guild_roles[2].clone()];
    let actor = MemberContext::with_roles(&actor_roles);
    let service = AccessService::default();

    let updated = service
        .update_member_roles(
            &actor,
            Permissions::empty(),
            &guild_roles,
            &[Snowflake::new(1)],
            &[Snowflake::new(2), Snowflake::new(1), Snowflake::new(2)],
        )
        .unwrap();
    assert_eq!(updated, vec![Snowflake::new(1), Snowflake::new(2)]);

    let err = service
        .update_member_roles(&actor, Permissions::empty(), &guild_roles, &[], &[Snowflake::new(4)])
        .unwrap_err();
    assert_eq!(
        err,
        AccessError::RoleUpdate(PermissionError::HierarchyViolation {
            role: Snowflake::new(4),
            position: 4,
        })
    );

    let err = service
        .update_member_roles(&actor, Permissions::empty(), &guild_roles, &[], &[Snowflake::new(3)])
        .unwrap_err();
    assert!(matches!(err, AccessError::RoleUpdate(PermissionError::HierarchyViolation { .. })));
}

#[test]
fn test_role_update_keeps_unchanged_higher_roles() {
    let guild_roles = vec![role(1, 1, 0), role(3, 3, MANAGE_ROLES), role(9, 9, 0)];
    let actor_roles = vec![guild_roles[1].clone()];
    let actor = MemberContext::with_roles(&actor_roles);
    let resolver = PermissionResolver::default();

    // Role 9 outranks the actor but stays assigned, so it is not checked.
    let updated = resolver
        .authorize_role_update(
            &actor,
            Permissions::empty(),
            &guild_roles,
            &[Snowflake::new(9)],
            &[Snowflake::new(9), Snowflake::new(1)],
        )
        .unwrap();
    assert_eq!(updated, vec![Snowflake::new(1), Snowflake::new(9)]);
}

#[test]
fn test_owner_may_assign_any_role() {
    let guild_roles = vec![role(1, 1, 0), role(50, 50, Permissions::ADMINISTRATOR)];
    let owner = MemberContext::new(true, &[], None);

    let updated = PermissionResolver::default()
        .authorize_role_update(&owner, Permissions::empty(), &guild_roles, &[], &[Snowflake::new(50)])
        .unwrap();
    assert_eq!(updated, vec![Snowflake::new(50)]);
}

#[test]
fn test_stored_moderator_mask_can_manage_roles() {
    // Masks as persisted for existing guilds: manage_roles is bit 27.
    let guild_roles = vec![role(1, 1, Permissions::DEFAULT), role(2, 2, 1 << 27)];
    let actor_roles = vec![guild_roles[1].clone()];
    let actor = MemberContext::with_roles(&actor_roles);

    assert_eq!(Permissions::new(1 << 27).names(), vec!["manage_roles"]);
    let updated = PermissionResolver::default()
        .authorize_role_update(&actor, Permissions::empty(), &guild_roles, &[], &[Snowflake::new(1)])
        .unwrap();
    assert_eq!(updated, vec![Snowflake::new(1)]);
}

//! Capability-resolution behavior that does not need a database: the
//! merge/override semantics behind the per-request authorization decision.

use std::collections::HashSet;

use propdesk::middleware::auth::AuthUser;
use propdesk_auth::Claims;
use propdesk_core::permissions::{
    Action, Capabilities, PermissionMap, Resource, Role, effective_actions, effective_map,
};

fn claims(role: &str) -> Claims {
    Claims {
        sub: uuid::Uuid::new_v4().to_string(),
        email: "someone@propdesk.test".to_string(),
        role: role.to_string(),
        exp: 9999999999,
        iat: 1234567890,
    }
}

fn actions(list: &[Action]) -> HashSet<Action> {
    list.iter().copied().collect()
}

#[test]
fn admin_is_granted_every_resource_and_action() {
    let caps = Capabilities::admin();
    for resource in Resource::ALL {
        for action in Action::ALL {
            assert!(caps.allows(resource, action), "{} {}", action, resource);
        }
    }
}

#[test]
fn role_grant_is_honored_without_override() {
    let mut role_map = PermissionMap::new();
    role_map.insert(Resource::Properties, actions(&[Action::Read]));

    let caps = Capabilities::resolved(effective_map(&role_map, &PermissionMap::new()));

    assert!(caps.allows(Resource::Properties, Action::Read));
    assert!(!caps.allows(Resource::Properties, Action::Create));
}

#[test]
fn user_override_replaces_rather_than_unions() {
    let mut role_map = PermissionMap::new();
    role_map.insert(
        Resource::Properties,
        actions(&[Action::Read, Action::Update, Action::Delete]),
    );

    // Override narrows access to read-only on this resource
    let mut user_map = PermissionMap::new();
    user_map.insert(Resource::Properties, actions(&[Action::Read]));

    let effective = effective_actions(&role_map, &user_map, Resource::Properties);
    assert_eq!(effective, actions(&[Action::Read]));

    // And widens it on a resource the role never granted
    user_map.insert(Resource::Contracts, actions(&[Action::Read, Action::Create]));
    let caps = Capabilities::resolved(effective_map(&role_map, &user_map));
    assert!(caps.allows(Resource::Contracts, Action::Create));
}

#[test]
fn agent_scenario_from_role_table_then_override() {
    // RolePermission{agent, properties, [read]}, no override
    let mut role_map = PermissionMap::new();
    role_map.insert(Resource::Properties, actions(&[Action::Read]));

    let caps = Capabilities::resolved(effective_map(&role_map, &PermissionMap::new()));
    assert!(caps.allows(Resource::Properties, Action::Read));
    assert!(!caps.allows(Resource::Properties, Action::Create));

    // UserPermission{user, properties, [read, create]} added
    let mut user_map = PermissionMap::new();
    user_map.insert(Resource::Properties, actions(&[Action::Read, Action::Create]));

    let caps = Capabilities::resolved(effective_map(&role_map, &user_map));
    assert!(caps.allows(Resource::Properties, Action::Create));
}

#[test]
fn unlisted_resources_are_denied() {
    let mut role_map = PermissionMap::new();
    role_map.insert(Resource::Properties, actions(&[Action::Read]));

    let caps = Capabilities::resolved(effective_map(&role_map, &PermissionMap::new()));
    for action in Action::ALL {
        assert!(!caps.allows(Resource::Payments, action));
    }
}

#[test]
fn auth_user_role_helpers() {
    assert!(AuthUser(claims("admin")).is_admin());
    assert!(!AuthUser(claims("guest")).is_admin());
    assert_eq!(AuthUser(claims("broker")).role().unwrap(), Role::Broker);
    assert!(AuthUser(claims("superuser")).role().is_err());
}

//! Permission vocabulary and effective-capability resolution.
//!
//! Access control is table-driven: a role-level permission table holds the
//! defaults for each (role, resource) pair, and a user-level table holds
//! per-user overrides. An override replaces the role entry for that resource
//! wholesale, so an administrator can narrow a user's access below the role
//! default as well as widen it. The admin role bypasses both tables.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// System roles. `Admin` is a universal wildcard grantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Agent,
    Broker,
    Guest,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Agent,
        Role::Broker,
        Role::Guest,
    ];

    /// Roles seeded with default permissions. Admin is excluded: it never
    /// consults the permission tables.
    pub const DEFAULT_GRANTEES: [Role; 4] =
        [Role::Manager, Role::Agent, Role::Broker, Role::Guest];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Agent => "agent",
            Role::Broker => "broker",
            Role::Guest => "guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "agent" => Ok(Role::Agent),
            "broker" => Ok(Role::Broker),
            "guest" => Ok(Role::Guest),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Actions a principal may perform on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Read, Action::Create, Action::Update, Action::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Action::Read),
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "delete" => Ok(Action::Delete),
            _ => Err(format!("Invalid action: {}", s)),
        }
    }
}

/// Resources subject to access control. Extending this list is a
/// configuration change; no resolver logic keys on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Properties,
    Contracts,
    Users,
    Payments,
    Features,
    Facilities,
    Media,
    Reminders,
    Owners,
    Clients,
}

impl Resource {
    pub const ALL: [Resource; 10] = [
        Resource::Properties,
        Resource::Contracts,
        Resource::Users,
        Resource::Payments,
        Resource::Features,
        Resource::Facilities,
        Resource::Media,
        Resource::Reminders,
        Resource::Owners,
        Resource::Clients,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Properties => "properties",
            Resource::Contracts => "contracts",
            Resource::Users => "users",
            Resource::Payments => "payments",
            Resource::Features => "features",
            Resource::Facilities => "facilities",
            Resource::Media => "media",
            Resource::Reminders => "reminders",
            Resource::Owners => "owners",
            Resource::Clients => "clients",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "properties" => Ok(Resource::Properties),
            "contracts" => Ok(Resource::Contracts),
            "users" => Ok(Resource::Users),
            "payments" => Ok(Resource::Payments),
            "features" => Ok(Resource::Features),
            "facilities" => Ok(Resource::Facilities),
            "media" => Ok(Resource::Media),
            "reminders" => Ok(Resource::Reminders),
            "owners" => Ok(Resource::Owners),
            "clients" => Ok(Resource::Clients),
            _ => Err(format!("Invalid resource: {}", s)),
        }
    }
}

/// Resource → granted actions, as loaded from one of the permission tables.
pub type PermissionMap = HashMap<Resource, HashSet<Action>>;

/// Parse stored action strings, dropping anything outside the vocabulary.
pub fn actions_from_strings(raw: &[String]) -> HashSet<Action> {
    raw.iter().filter_map(|s| s.parse().ok()).collect()
}

/// Effective action-set for one resource: the user entry verbatim when one
/// exists (even if empty), otherwise the role entry, otherwise nothing.
pub fn effective_actions(
    role_map: &PermissionMap,
    user_map: &PermissionMap,
    resource: Resource,
) -> HashSet<Action> {
    user_map
        .get(&resource)
        .or_else(|| role_map.get(&resource))
        .cloned()
        .unwrap_or_default()
}

/// Full effective map: role defaults with every user entry replacing (not
/// unioning into) its resource's set.
pub fn effective_map(role_map: &PermissionMap, user_map: &PermissionMap) -> PermissionMap {
    let mut merged = role_map.clone();
    for (resource, actions) in user_map {
        merged.insert(*resource, actions.clone());
    }
    merged
}

/// Per-request resolved capabilities, attached to the request for
/// downstream handlers. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    admin: bool,
    map: PermissionMap,
}

impl Capabilities {
    /// Admin wildcard: every action on every resource, no table lookups.
    pub fn admin() -> Self {
        Self {
            admin: true,
            map: PermissionMap::new(),
        }
    }

    pub fn resolved(map: PermissionMap) -> Self {
        Self { admin: false, map }
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        if self.admin {
            return true;
        }
        self.map
            .get(&resource)
            .is_some_and(|actions| actions.contains(&action))
    }
}

/// Actions granted by the bootstrap seeding.
pub const DEFAULT_SEED_ACTIONS: [Action; 1] = [Action::Read];

/// Every (role, resource) pair the bootstrap must cover. The seeding itself
/// is conflict-tolerant, so re-running over this grid is idempotent.
pub fn default_permission_grid() -> Vec<(Role, Resource)> {
    let mut grid = Vec::with_capacity(Role::DEFAULT_GRANTEES.len() * Resource::ALL.len());
    for role in Role::DEFAULT_GRANTEES {
        for resource in Resource::ALL {
            grid.push((role, resource));
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actions(list: &[Action]) -> HashSet<Action> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_role_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("landlord".parse::<Role>().is_err());
    }

    #[test]
    fn test_resource_round_trip() {
        for resource in Resource::ALL {
            assert_eq!(resource.as_str().parse::<Resource>().unwrap(), resource);
        }
        assert!("listings".parse::<Resource>().is_err());
    }

    #[test]
    fn test_actions_from_strings_drops_unknown() {
        let raw = vec![
            "read".to_string(),
            "create".to_string(),
            "manage".to_string(),
        ];
        let parsed = actions_from_strings(&raw);
        assert_eq!(parsed, actions(&[Action::Read, Action::Create]));
    }

    #[test]
    fn test_admin_allows_everything() {
        let caps = Capabilities::admin();
        for resource in Resource::ALL {
            for action in Action::ALL {
                assert!(caps.allows(resource, action));
            }
        }
    }

    #[test]
    fn test_role_grant_allows_iff_granted() {
        let mut role_map = PermissionMap::new();
        role_map.insert(Resource::Properties, actions(&[Action::Read]));

        let caps = Capabilities::resolved(effective_map(&role_map, &PermissionMap::new()));
        assert!(caps.allows(Resource::Properties, Action::Read));
        assert!(!caps.allows(Resource::Properties, Action::Create));
        assert!(!caps.allows(Resource::Contracts, Action::Read));
    }

    #[test]
    fn test_user_override_replaces_role_set() {
        let mut role_map = PermissionMap::new();
        role_map.insert(Resource::Properties, actions(&[Action::Read]));

        let mut user_map = PermissionMap::new();
        user_map.insert(Resource::Properties, actions(&[Action::Read, Action::Create]));

        let caps = Capabilities::resolved(effective_map(&role_map, &user_map));
        assert!(caps.allows(Resource::Properties, Action::Create));
        assert!(caps.allows(Resource::Properties, Action::Read));
    }

    #[test]
    fn test_user_override_can_narrow_below_role_default() {
        let mut role_map = PermissionMap::new();
        role_map.insert(
            Resource::Users,
            actions(&[Action::Read, Action::Update, Action::Delete]),
        );

        let mut user_map = PermissionMap::new();
        user_map.insert(Resource::Users, actions(&[Action::Read]));

        let effective = effective_actions(&role_map, &user_map, Resource::Users);
        assert_eq!(effective, actions(&[Action::Read]));
    }

    #[test]
    fn test_empty_override_entry_still_replaces() {
        let mut role_map = PermissionMap::new();
        role_map.insert(Resource::Payments, actions(&[Action::Read]));

        let mut user_map = PermissionMap::new();
        user_map.insert(Resource::Payments, HashSet::new());

        let effective = effective_actions(&role_map, &user_map, Resource::Payments);
        assert!(effective.is_empty());
    }

    #[test]
    fn test_override_leaves_other_resources_alone() {
        let mut role_map = PermissionMap::new();
        role_map.insert(Resource::Properties, actions(&[Action::Read]));
        role_map.insert(Resource::Contracts, actions(&[Action::Read, Action::Update]));

        let mut user_map = PermissionMap::new();
        user_map.insert(Resource::Properties, actions(&[Action::Delete]));

        let merged = effective_map(&role_map, &user_map);
        assert_eq!(merged[&Resource::Properties], actions(&[Action::Delete]));
        assert_eq!(
            merged[&Resource::Contracts],
            actions(&[Action::Read, Action::Update])
        );
    }

    #[test]
    fn test_deny_by_default() {
        let caps = Capabilities::resolved(PermissionMap::new());
        for resource in Resource::ALL {
            for action in Action::ALL {
                assert!(!caps.allows(resource, action));
            }
        }
    }

    #[test]
    fn test_default_grid_covers_every_pair_once() {
        let grid = default_permission_grid();
        assert_eq!(
            grid.len(),
            Role::DEFAULT_GRANTEES.len() * Resource::ALL.len()
        );

        let unique: HashSet<_> = grid.iter().collect();
        assert_eq!(unique.len(), grid.len());
        assert!(grid.iter().all(|(role, _)| *role != Role::Admin));
        for resource in Resource::ALL {
            assert!(grid.iter().any(|(_, r)| *r == resource));
        }
    }
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use propdesk_core::permissions::{Action, Resource, Role};

/// One row of the role-level permission table. `actions` is stored as a
/// text array; unknown entries are ignored when the row is turned into a
/// capability set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RolePermission {
    pub id: Uuid,
    pub role: String,
    pub resource: String,
    pub actions: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRolePermissionDto {
    pub role: Role,
    pub resource: Resource,
    pub actions: Vec<Action>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePermissionActionsDto {
    pub actions: Vec<Action>,
}

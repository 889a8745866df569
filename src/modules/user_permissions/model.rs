use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use propdesk_core::permissions::{Action, Resource};

/// Per-user permission override. When a row exists for (user, resource) it
/// replaces the role-level entry for that resource entirely.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserPermission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resource: String,
    pub actions: Vec<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserPermissionDto {
    /// User id, email, or nickname
    pub user: String,
    pub resource: Resource,
    pub actions: Vec<Action>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserPermissionActionsDto {
    pub actions: Vec<Action>,
}

use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::permissions::{Action, PermissionMap, Resource, actions_from_strings};

use super::model::UserPermission;

const RETURNING: &str =
    "RETURNING id, user_id, resource, actions, created_at, updated_at";

fn action_strings(actions: &[Action]) -> Vec<String> {
    actions.iter().map(|a| a.to_string()).collect()
}

pub struct UserPermissionService;

impl UserPermissionService {
    /// Resolve a user by id, email, or nickname. Soft-deleted users cannot
    /// receive overrides.
    #[instrument(skip(db))]
    pub async fn resolve_user(db: &PgPool, identifier: &str) -> Result<Uuid, AppError> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM users
             WHERE (id::text = $1 OR email = $1 OR nickname = $1) AND status <> 'deleted'",
        )
        .bind(identifier)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, identifier, "Database error resolving user");
            AppError::database(e)
        })?;

        user_id.ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db), fields(db.table = "user_permissions"))]
    pub async fn create(
        db: &PgPool,
        identifier: &str,
        resource: Resource,
        actions: &[Action],
    ) -> Result<UserPermission, AppError> {
        let user_id = Self::resolve_user(db, identifier).await?;

        let permission = sqlx::query_as::<_, UserPermission>(&format!(
            "INSERT INTO user_permissions (user_id, resource, actions) VALUES ($1, $2, $3) {}",
            RETURNING
        ))
        .bind(user_id)
        .bind(resource.as_str())
        .bind(action_strings(actions))
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(user.id = %user_id, %resource, "Duplicate user permission");
                return AppError::bad_request(anyhow::anyhow!(
                    "Permission already exists for this user and resource"
                ));
            }
            error!(error = %e, user.id = %user_id, %resource, "Database error creating user permission");
            AppError::database(e)
        })?;

        info!(user.id = %user_id, %resource, "User permission created");
        Ok(permission)
    }

    #[instrument(skip(db), fields(db.table = "user_permissions"))]
    pub async fn get_all(db: &PgPool) -> Result<Vec<UserPermission>, AppError> {
        sqlx::query_as::<_, UserPermission>(
            "SELECT id, user_id, resource, actions, created_at, updated_at
             FROM user_permissions ORDER BY user_id, resource",
        )
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching user permissions");
            AppError::database(e)
        })
    }

    #[instrument(skip(db), fields(db.table = "user_permissions"))]
    pub async fn get_for_user(
        db: &PgPool,
        identifier: &str,
    ) -> Result<Vec<UserPermission>, AppError> {
        let user_id = Self::resolve_user(db, identifier).await?;

        sqlx::query_as::<_, UserPermission>(
            "SELECT id, user_id, resource, actions, created_at, updated_at
             FROM user_permissions WHERE user_id = $1 ORDER BY resource",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %user_id, "Database error fetching user permissions");
            AppError::database(e)
        })
    }

    /// Upsert the override for a (user, resource) pair.
    #[instrument(skip(db), fields(db.table = "user_permissions"))]
    pub async fn update(
        db: &PgPool,
        identifier: &str,
        resource: Resource,
        actions: &[Action],
    ) -> Result<UserPermission, AppError> {
        let user_id = Self::resolve_user(db, identifier).await?;

        let permission = sqlx::query_as::<_, UserPermission>(&format!(
            "INSERT INTO user_permissions (user_id, resource, actions) VALUES ($1, $2, $3)
             ON CONFLICT (user_id, resource)
             DO UPDATE SET actions = EXCLUDED.actions, updated_at = now() {}",
            RETURNING
        ))
        .bind(user_id)
        .bind(resource.as_str())
        .bind(action_strings(actions))
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %user_id, %resource, "Database error updating user permission");
            AppError::database(e)
        })?;

        info!(user.id = %user_id, %resource, actions = ?permission.actions, "User permission updated");
        Ok(permission)
    }

    #[instrument(skip(db), fields(db.table = "user_permissions"))]
    pub async fn delete(
        db: &PgPool,
        identifier: &str,
        resource: Resource,
    ) -> Result<(), AppError> {
        let user_id = Self::resolve_user(db, identifier).await?;

        let result =
            sqlx::query("DELETE FROM user_permissions WHERE user_id = $1 AND resource = $2")
                .bind(user_id)
                .bind(resource.as_str())
                .execute(db)
                .await
                .map_err(|e| {
                    error!(error = %e, user.id = %user_id, %resource, "Database error deleting user permission");
                    AppError::database(e)
                })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Permission not found")));
        }

        info!(user.id = %user_id, %resource, "User permission deleted");
        Ok(())
    }

    /// The user's override rows as a resource → action-set map, for the
    /// capability resolver.
    #[instrument(skip(db), fields(db.table = "user_permissions"))]
    pub async fn permission_map(db: &PgPool, user_id: Uuid) -> Result<PermissionMap, AppError> {
        let rows: Vec<(String, Vec<String>)> = sqlx::query_as(
            "SELECT resource, actions FROM user_permissions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .map_err(AppError::database)?;

        let mut map = PermissionMap::new();
        for (resource, actions) in rows {
            match resource.parse::<Resource>() {
                Ok(resource) => {
                    map.insert(resource, actions_from_strings(&actions));
                }
                Err(_) => {
                    debug!(%resource, "Skipping permission row with unknown resource");
                }
            }
        }
        Ok(map)
    }
}

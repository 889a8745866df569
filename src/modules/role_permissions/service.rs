use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};

use propdesk_core::AppError;
use propdesk_core::permissions::{
    Action, PermissionMap, Resource, Role, actions_from_strings, default_permission_grid,
    DEFAULT_SEED_ACTIONS,
};

use super::model::RolePermission;

const RETURNING: &str =
    "RETURNING id, role, resource, actions, created_at, updated_at";

fn action_strings(actions: &[Action]) -> Vec<String> {
    actions.iter().map(|a| a.to_string()).collect()
}

pub struct RolePermissionService;

impl RolePermissionService {
    #[instrument(skip(db), fields(db.table = "role_permissions"))]
    pub async fn create(
        db: &PgPool,
        role: Role,
        resource: Resource,
        actions: &[Action],
    ) -> Result<RolePermission, AppError> {
        let permission = sqlx::query_as::<_, RolePermission>(&format!(
            "INSERT INTO role_permissions (role, resource, actions) VALUES ($1, $2, $3) {}",
            RETURNING
        ))
        .bind(role.as_str())
        .bind(resource.as_str())
        .bind(action_strings(actions))
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(%role, %resource, "Duplicate role permission");
                return AppError::bad_request(anyhow::anyhow!(
                    "Permission already exists for this role and resource"
                ));
            }
            error!(error = %e, %role, %resource, "Database error creating role permission");
            AppError::database(e)
        })?;

        info!(%role, %resource, "Role permission created");
        Ok(permission)
    }

    #[instrument(skip(db), fields(db.table = "role_permissions"))]
    pub async fn get_all(db: &PgPool) -> Result<Vec<RolePermission>, AppError> {
        sqlx::query_as::<_, RolePermission>(
            "SELECT id, role, resource, actions, created_at, updated_at
             FROM role_permissions ORDER BY role, resource",
        )
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching role permissions");
            AppError::database(e)
        })
    }

    #[instrument(skip(db), fields(db.table = "role_permissions"))]
    pub async fn get_by_role(db: &PgPool, role: Role) -> Result<Vec<RolePermission>, AppError> {
        sqlx::query_as::<_, RolePermission>(
            "SELECT id, role, resource, actions, created_at, updated_at
             FROM role_permissions WHERE role = $1 ORDER BY resource",
        )
        .bind(role.as_str())
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, %role, "Database error fetching role permissions");
            AppError::database(e)
        })
    }

    /// Upsert the action set for a (role, resource) pair. Creates the row
    /// when it does not exist yet, mirroring how an update-by-key behaves
    /// for a permission table keyed on the pair.
    #[instrument(skip(db), fields(db.table = "role_permissions"))]
    pub async fn update(
        db: &PgPool,
        role: Role,
        resource: Resource,
        actions: &[Action],
    ) -> Result<RolePermission, AppError> {
        let permission = sqlx::query_as::<_, RolePermission>(&format!(
            "INSERT INTO role_permissions (role, resource, actions) VALUES ($1, $2, $3)
             ON CONFLICT (role, resource)
             DO UPDATE SET actions = EXCLUDED.actions, updated_at = now() {}",
            RETURNING
        ))
        .bind(role.as_str())
        .bind(resource.as_str())
        .bind(action_strings(actions))
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(error = %e, %role, %resource, "Database error updating role permission");
            AppError::database(e)
        })?;

        info!(%role, %resource, actions = ?permission.actions, "Role permission updated");
        Ok(permission)
    }

    #[instrument(skip(db), fields(db.table = "role_permissions"))]
    pub async fn delete(db: &PgPool, role: Role, resource: Resource) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM role_permissions WHERE role = $1 AND resource = $2")
            .bind(role.as_str())
            .bind(resource.as_str())
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, %role, %resource, "Database error deleting role permission");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Permission not found")));
        }

        info!(%role, %resource, "Role permission deleted");
        Ok(())
    }

    /// The role's permission rows as a resource → action-set map, for the
    /// capability resolver. Rows whose resource or actions fall outside the
    /// vocabulary are skipped.
    #[instrument(skip(db), fields(db.table = "role_permissions"))]
    pub async fn permission_map(db: &PgPool, role: Role) -> Result<PermissionMap, AppError> {
        let rows: Vec<(String, Vec<String>)> = sqlx::query_as(
            "SELECT resource, actions FROM role_permissions WHERE role = $1",
        )
        .bind(role.as_str())
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

    /// Seed read-only defaults for every (role, resource) pair not yet
    /// present. Conflict-tolerant, so running it repeatedly neither errors
    /// nor overwrites rows that were changed since.
    #[instrument(skip(db))]
    pub async fn seed_defaults(db: &PgPool) -> Result<u64, AppError> {
        let default_actions = action_strings(&DEFAULT_SEED_ACTIONS);
        let mut created = 0;

        for (role, resource) in default_permission_grid() {
            let result = sqlx::query(
                "INSERT INTO role_permissions (role, resource, actions) VALUES ($1, $2, $3)
                 ON CONFLICT (role, resource) DO NOTHING",
            )
            .bind(role.as_str())
            .bind(resource.as_str())
            .bind(&default_actions)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, %role, %resource, "Database error seeding default permission");
                AppError::database(e)
            })?;

            if result.rows_affected() > 0 {
                debug!(%role, %resource, "Created default permission");
                created += 1;
            }
        }

        info!(created, "Default permissions initialized");
        Ok(created)
    }
}

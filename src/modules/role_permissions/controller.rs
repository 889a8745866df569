use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use propdesk_core::AppError;
use propdesk_core::permissions::{Resource, Role};

use crate::state::AppState;

use super::model::{CreateRolePermissionDto, RolePermission, UpdatePermissionActionsDto};
use super::service::RolePermissionService;

#[utoipa::path(
    post,
    path = "/api/v1/role-permissions",
    request_body = CreateRolePermissionDto,
    responses(
        (status = 201, description = "Role permission created", body = RolePermission),
        (status = 400, description = "Permission already exists for this role and resource"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Role permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_role_permission(
    State(state): State<AppState>,
    Json(dto): Json<CreateRolePermissionDto>,
) -> Result<(StatusCode, Json<RolePermission>), AppError> {
    let permission =
        RolePermissionService::create(&state.db, dto.role, dto.resource, &dto.actions).await?;

    Ok((StatusCode::CREATED, Json(permission)))
}

#[utoipa::path(
    get,
    path = "/api/v1/role-permissions",
    responses(
        (status = 200, description = "All role permissions", body = [RolePermission]),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Role permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_role_permissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<RolePermission>>, AppError> {
    Ok(Json(RolePermissionService::get_all(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/role-permissions/{role}",
    params(("role" = String, Path, description = "Role name")),
    responses(
        (status = 200, description = "Permissions for the role", body = [RolePermission]),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Role permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_role_permissions_by_role(
    State(state): State<AppState>,
    Path(role): Path<Role>,
) -> Result<Json<Vec<RolePermission>>, AppError> {
    Ok(Json(RolePermissionService::get_by_role(&state.db, role).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/role-permissions/{role}/{resource}",
    params(
        ("role" = String, Path, description = "Role name"),
        ("resource" = String, Path, description = "Resource name")
    ),
    request_body = UpdatePermissionActionsDto,
    responses(
        (status = 200, description = "Role permission updated", body = RolePermission),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Role permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_role_permission(
    State(state): State<AppState>,
    Path((role, resource)): Path<(Role, Resource)>,
    Json(dto): Json<UpdatePermissionActionsDto>,
) -> Result<Json<RolePermission>, AppError> {
    let permission =
        RolePermissionService::update(&state.db, role, resource, &dto.actions).await?;

    Ok(Json(permission))
}

#[utoipa::path(
    delete,
    path = "/api/v1/role-permissions/{role}/{resource}",
    params(
        ("role" = String, Path, description = "Role name"),
        ("resource" = String, Path, description = "Resource name")
    ),
    responses(
        (status = 204, description = "Role permission deleted"),
        (status = 404, description = "Permission not found"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "Role permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_role_permission(
    State(state): State<AppState>,
    Path((role, resource)): Path<(Role, Resource)>,
) -> Result<StatusCode, AppError> {
    RolePermissionService::delete(&state.db, role, resource).await?;

    Ok(StatusCode::NO_CONTENT)
}

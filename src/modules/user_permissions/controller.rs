use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use propdesk_core::AppError;
use propdesk_core::permissions::Resource;

use crate::state::AppState;

use super::model::{
    CreateUserPermissionDto, UpdateUserPermissionActionsDto, UserPermission,
};
use super::service::UserPermissionService;

#[utoipa::path(
    post,
    path = "/api/v1/user-permissions",
    request_body = CreateUserPermissionDto,
    responses(
        (status = 201, description = "User permission created", body = UserPermission),
        (status = 400, description = "Permission already exists for this user and resource"),
        (status = 404, description = "User not found"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "User permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn create_user_permission(
    State(state): State<AppState>,
    Json(dto): Json<CreateUserPermissionDto>,
) -> Result<(StatusCode, Json<UserPermission>), AppError> {
    let permission =
        UserPermissionService::create(&state.db, &dto.user, dto.resource, &dto.actions).await?;

    Ok((StatusCode::CREATED, Json(permission)))
}

#[utoipa::path(
    get,
    path = "/api/v1/user-permissions",
    responses(
        (status = 200, description = "All user permission overrides", body = [UserPermission]),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "User permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user_permissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserPermission>>, AppError> {
    Ok(Json(UserPermissionService::get_all(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/user-permissions/{identifier}",
    params(("identifier" = String, Path, description = "User id, email, or nickname")),
    responses(
        (status = 200, description = "Overrides for the user", body = [UserPermission]),
        (status = 404, description = "User not found"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "User permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_user_permissions_for_user(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<Vec<UserPermission>>, AppError> {
    Ok(Json(
        UserPermissionService::get_for_user(&state.db, &identifier).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/user-permissions/{identifier}/{resource}",
    params(
        ("identifier" = String, Path, description = "User id, email, or nickname"),
        ("resource" = String, Path, description = "Resource name")
    ),
    request_body = UpdateUserPermissionActionsDto,
    responses(
        (status = 200, description = "User permission updated", body = UserPermission),
        (status = 404, description = "User not found"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "User permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn update_user_permission(
    State(state): State<AppState>,
    Path((identifier, resource)): Path<(String, Resource)>,
    Json(dto): Json<UpdateUserPermissionActionsDto>,
) -> Result<Json<UserPermission>, AppError> {
    let permission =
        UserPermissionService::update(&state.db, &identifier, resource, &dto.actions).await?;

    Ok(Json(permission))
}

#[utoipa::path(
    delete,
    path = "/api/v1/user-permissions/{identifier}/{resource}",
    params(
        ("identifier" = String, Path, description = "User id, email, or nickname"),
        ("resource" = String, Path, description = "Resource name")
    ),
    responses(
        (status = 204, description = "User permission deleted"),
        (status = 404, description = "Permission not found"),
        (status = 403, description = "Forbidden - admin only")
    ),
    tag = "User permissions",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_user_permission(
    State(state): State<AppState>,
    Path((identifier, resource)): Path<(String, Resource)>,
) -> Result<StatusCode, AppError> {
    UserPermissionService::delete(&state.db, &identifier, resource).await?;

    Ok(StatusCode::NO_CONTENT)
}

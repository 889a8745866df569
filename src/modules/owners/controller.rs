use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use propdesk_core::AppError;
use propdesk_core::listing::{ListQuery, ListResult};

use crate::middleware::authorize::{
    RequireOwnersCreate, RequireOwnersDelete, RequireOwnersRead, RequireOwnersUpdate,
};
use crate::state::AppState;

use super::model::{CreateOwnerDto, Owner, UpdateOwnerDto};
use super::service::OwnerService;

#[utoipa::path(
    post,
    path = "/api/v1/owners",
    request_body = CreateOwnerDto,
    responses(
        (status = 201, description = "Owner created", body = Owner),
        (status = 400, description = "Invalid input or duplicate email"),
        (status = 403, description = "Forbidden - requires create on owners")
    ),
    tag = "Owners",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_owner(
    State(state): State<AppState>,
    RequireOwnersCreate(_auth_user): RequireOwnersCreate,
    Json(dto): Json<CreateOwnerDto>,
) -> Result<(StatusCode, Json<Owner>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let owner = OwnerService::create_owner(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(owner)))
}

#[utoipa::path(
    get,
    path = "/api/v1/owners",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated owners with counts", body = ListResult),
        (status = 403, description = "Forbidden - requires read on owners")
    ),
    tag = "Owners",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_owners(
    State(state): State<AppState>,
    RequireOwnersRead(_auth_user): RequireOwnersRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(OwnerService::get_owners(&state.db, &params).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/owners/{id}",
    params(("id" = Uuid, Path, description = "Owner ID")),
    responses(
        (status = 200, description = "Owner details", body = Owner),
        (status = 404, description = "Owner not found")
    ),
    tag = "Owners",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_owner(
    State(state): State<AppState>,
    RequireOwnersRead(_auth_user): RequireOwnersRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Owner>, AppError> {
    Ok(Json(OwnerService::get_owner_by_id(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/owners/{id}",
    params(("id" = Uuid, Path, description = "Owner ID")),
    request_body = UpdateOwnerDto,
    responses(
        (status = 200, description = "Owner updated", body = Owner),
        (status = 404, description = "Owner not found")
    ),
    tag = "Owners",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_owner(
    State(state): State<AppState>,
    RequireOwnersUpdate(_auth_user): RequireOwnersUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateOwnerDto>,
) -> Result<Json<Owner>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    Ok(Json(OwnerService::update_owner(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/owners/{id}",
    params(("id" = Uuid, Path, description = "Owner ID")),
    responses(
        (status = 204, description = "Owner deleted"),
        (status = 404, description = "Owner not found")
    ),
    tag = "Owners",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_owner(
    State(state): State<AppState>,
    RequireOwnersDelete(_auth_user): RequireOwnersDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    OwnerService::delete_owner(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

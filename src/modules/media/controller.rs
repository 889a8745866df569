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
    RequireMediaCreate, RequireMediaDelete, RequireMediaRead, RequireMediaUpdate,
};
use crate::state::AppState;

use super::model::{CreateMediaDto, PropertyMediaWithUrl, UpdateMediaDto};
use super::service::MediaService;

#[utoipa::path(
    post,
    path = "/api/v1/media",
    request_body = CreateMediaDto,
    responses(
        (status = 201, description = "Media created", body = PropertyMediaWithUrl),
        (status = 404, description = "Property not found"),
        (status = 403, description = "Forbidden - requires create on media")
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_media(
    State(state): State<AppState>,
    RequireMediaCreate(_auth_user): RequireMediaCreate,
    Json(dto): Json<CreateMediaDto>,
) -> Result<(StatusCode, Json<PropertyMediaWithUrl>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let media = MediaService::create_media(&state.db, &state.storage_config, dto).await?;

    Ok((StatusCode::CREATED, Json(media)))
}

#[utoipa::path(
    get,
    path = "/api/v1/media",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated media with signed URLs", body = ListResult),
        (status = 403, description = "Forbidden - requires read on media")
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_media_list(
    State(state): State<AppState>,
    RequireMediaRead(_auth_user): RequireMediaRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(
        MediaService::get_media_list(&state.db, &state.storage_config, &params).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/media/{id}",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 200, description = "Media details with signed URL", body = PropertyMediaWithUrl),
        (status = 404, description = "Media not found")
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_media(
    State(state): State<AppState>,
    RequireMediaRead(_auth_user): RequireMediaRead,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyMediaWithUrl>, AppError> {
    Ok(Json(
        MediaService::get_media_by_id(&state.db, &state.storage_config, id).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/media/{id}",
    params(("id" = Uuid, Path, description = "Media ID")),
    request_body = UpdateMediaDto,
    responses(
        (status = 200, description = "Media updated", body = PropertyMediaWithUrl),
        (status = 404, description = "Media not found")
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_media(
    State(state): State<AppState>,
    RequireMediaUpdate(_auth_user): RequireMediaUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateMediaDto>,
) -> Result<Json<PropertyMediaWithUrl>, AppError> {
    Ok(Json(
        MediaService::update_media(&state.db, &state.storage_config, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/media/{id}",
    params(("id" = Uuid, Path, description = "Media ID")),
    responses(
        (status = 204, description = "Media deleted"),
        (status = 404, description = "Media not found")
    ),
    tag = "Media",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_media(
    State(state): State<AppState>,
    RequireMediaDelete(_auth_user): RequireMediaDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    MediaService::delete_media(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

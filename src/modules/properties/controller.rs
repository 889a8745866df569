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
    RequirePropertiesCreate, RequirePropertiesDelete, RequirePropertiesRead,
    RequirePropertiesUpdate,
};
use crate::state::AppState;

use super::model::{CreatePropertyDto, Property, PropertyStatusDto, UpdatePropertyDto};
use super::service::PropertyService;

#[utoipa::path(
    post,
    path = "/api/v1/properties",
    request_body = CreatePropertyDto,
    responses(
        (status = 201, description = "Property created", body = Property),
        (status = 400, description = "Invalid input or duplicate reference ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires create on properties")
    ),
    tag = "Properties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_property(
    State(state): State<AppState>,
    RequirePropertiesCreate(_auth_user): RequirePropertiesCreate,
    Json(dto): Json<CreatePropertyDto>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let property = PropertyService::create_property(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(property)))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated properties with media attached", body = ListResult),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - requires read on properties")
    ),
    tag = "Properties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_properties(
    State(state): State<AppState>,
    RequirePropertiesRead(_auth_user): RequirePropertiesRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(
        PropertyService::get_properties(&state.db, &state.storage_config, &params).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/properties/{id}",
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property details", body = Property),
        (status = 404, description = "Property not found")
    ),
    tag = "Properties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_property(
    State(state): State<AppState>,
    RequirePropertiesRead(_auth_user): RequirePropertiesRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(PropertyService::get_property_by_id(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/properties/{id}",
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body = UpdatePropertyDto,
    responses(
        (status = 200, description = "Property updated", body = Property),
        (status = 404, description = "Property not found")
    ),
    tag = "Properties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_property(
    State(state): State<AppState>,
    RequirePropertiesUpdate(_auth_user): RequirePropertiesUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdatePropertyDto>,
) -> Result<Json<Property>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    Ok(Json(
        PropertyService::update_property(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/properties/{id}",
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 204, description = "Property deleted"),
        (status = 404, description = "Property not found")
    ),
    tag = "Properties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_property(
    State(state): State<AppState>,
    RequirePropertiesDelete(_auth_user): RequirePropertiesDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    PropertyService::delete_property(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/v1/properties/status/{id}",
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body = PropertyStatusDto,
    responses(
        (status = 200, description = "Property status changed", body = Property),
        (status = 404, description = "Property not found")
    ),
    tag = "Properties",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn set_property_status(
    State(state): State<AppState>,
    RequirePropertiesUpdate(_auth_user): RequirePropertiesUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<PropertyStatusDto>,
) -> Result<Json<Property>, AppError> {
    Ok(Json(
        PropertyService::set_property_status(&state.db, id, dto.status).await?,
    ))
}

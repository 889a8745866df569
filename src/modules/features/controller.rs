use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::listing::{ListQuery, ListResult};

use crate::middleware::authorize::{
    RequireFeaturesCreate, RequireFeaturesDelete, RequireFeaturesRead, RequireFeaturesUpdate,
};
use crate::state::AppState;

use super::model::{CreateFeatureDto, PropertyFeature, UpdateFeatureDto};
use super::service::FeatureService;

#[utoipa::path(
    post,
    path = "/api/v1/features",
    request_body = CreateFeatureDto,
    responses(
        (status = 201, description = "Feature record created", body = PropertyFeature),
        (status = 400, description = "Property already has a feature record"),
        (status = 404, description = "Property not found")
    ),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_feature(
    State(state): State<AppState>,
    RequireFeaturesCreate(_auth_user): RequireFeaturesCreate,
    Json(dto): Json<CreateFeatureDto>,
) -> Result<(StatusCode, Json<PropertyFeature>), AppError> {
    let feature = FeatureService::create_feature(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(feature)))
}

#[utoipa::path(
    get,
    path = "/api/v1/features",
    params(ListQuery),
    responses((status = 200, description = "Paginated feature records", body = ListResult)),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_features(
    State(state): State<AppState>,
    RequireFeaturesRead(_auth_user): RequireFeaturesRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(FeatureService::get_features(&state.db, &params).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/features/{id}",
    params(("id" = Uuid, Path, description = "Feature record ID")),
    responses(
        (status = 200, description = "Feature record", body = PropertyFeature),
        (status = 404, description = "Feature record not found")
    ),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_feature(
    State(state): State<AppState>,
    RequireFeaturesRead(_auth_user): RequireFeaturesRead,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyFeature>, AppError> {
    Ok(Json(FeatureService::get_feature_by_id(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/features/property/{property_id}",
    params(("property_id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Feature record for the property", body = PropertyFeature),
        (status = 404, description = "Feature record not found")
    ),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_feature_by_property(
    State(state): State<AppState>,
    RequireFeaturesRead(_auth_user): RequireFeaturesRead,
    Path(property_id): Path<Uuid>,
) -> Result<Json<PropertyFeature>, AppError> {
    Ok(Json(
        FeatureService::get_feature_by_property(&state.db, property_id).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/features/{id}",
    params(("id" = Uuid, Path, description = "Feature record ID")),
    request_body = UpdateFeatureDto,
    responses(
        (status = 200, description = "Feature record updated", body = PropertyFeature),
        (status = 404, description = "Feature record not found")
    ),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_feature(
    State(state): State<AppState>,
    RequireFeaturesUpdate(_auth_user): RequireFeaturesUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateFeatureDto>,
) -> Result<Json<PropertyFeature>, AppError> {
    Ok(Json(FeatureService::update_feature(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/features/{id}",
    params(("id" = Uuid, Path, description = "Feature record ID")),
    responses(
        (status = 204, description = "Feature record deleted"),
        (status = 404, description = "Feature record not found")
    ),
    tag = "Features",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_feature(
    State(state): State<AppState>,
    RequireFeaturesDelete(_auth_user): RequireFeaturesDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    FeatureService::delete_feature(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

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
    RequireFacilitiesCreate, RequireFacilitiesDelete, RequireFacilitiesRead,
    RequireFacilitiesUpdate,
};
use crate::state::AppState;

use super::model::{CreateFacilityDto, PropertyFacility, UpdateFacilityDto};
use super::service::FacilityService;

#[utoipa::path(
    post,
    path = "/api/v1/facilities",
    request_body = CreateFacilityDto,
    responses(
        (status = 201, description = "Facility record created", body = PropertyFacility),
        (status = 400, description = "Property already has a facility record"),
        (status = 404, description = "Property not found")
    ),
    tag = "Facilities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_facility(
    State(state): State<AppState>,
    RequireFacilitiesCreate(_auth_user): RequireFacilitiesCreate,
    Json(dto): Json<CreateFacilityDto>,
) -> Result<(StatusCode, Json<PropertyFacility>), AppError> {
    let facility = FacilityService::create_facility(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(facility)))
}

#[utoipa::path(
    get,
    path = "/api/v1/facilities",
    params(ListQuery),
    responses((status = 200, description = "Paginated facility records", body = ListResult)),
    tag = "Facilities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_facilities(
    State(state): State<AppState>,
    RequireFacilitiesRead(_auth_user): RequireFacilitiesRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(
        FacilityService::get_facilities(&state.db, &params).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/facilities/{id}",
    params(("id" = Uuid, Path, description = "Facility record ID")),
    responses(
        (status = 200, description = "Facility record", body = PropertyFacility),
        (status = 404, description = "Facility record not found")
    ),
    tag = "Facilities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_facility(
    State(state): State<AppState>,
    RequireFacilitiesRead(_auth_user): RequireFacilitiesRead,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyFacility>, AppError> {
    Ok(Json(FacilityService::get_facility_by_id(&state.db, id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/facilities/property/{property_id}",
    params(("property_id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Facility record for the property", body = PropertyFacility),
        (status = 404, description = "Facility record not found")
    ),
    tag = "Facilities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_facility_by_property(
    State(state): State<AppState>,
    RequireFacilitiesRead(_auth_user): RequireFacilitiesRead,
    Path(property_id): Path<Uuid>,
) -> Result<Json<PropertyFacility>, AppError> {
    Ok(Json(
        FacilityService::get_facility_by_property(&state.db, property_id).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/facilities/{id}",
    params(("id" = Uuid, Path, description = "Facility record ID")),
    request_body = UpdateFacilityDto,
    responses(
        (status = 200, description = "Facility record updated", body = PropertyFacility),
        (status = 404, description = "Facility record not found")
    ),
    tag = "Facilities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_facility(
    State(state): State<AppState>,
    RequireFacilitiesUpdate(_auth_user): RequireFacilitiesUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateFacilityDto>,
) -> Result<Json<PropertyFacility>, AppError> {
    Ok(Json(
        FacilityService::update_facility(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/facilities/{id}",
    params(("id" = Uuid, Path, description = "Facility record ID")),
    responses(
        (status = 204, description = "Facility record deleted"),
        (status = 404, description = "Facility record not found")
    ),
    tag = "Facilities",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_facility(
    State(state): State<AppState>,
    RequireFacilitiesDelete(_auth_user): RequireFacilitiesDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    FacilityService::delete_facility(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

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
    RequireContractsCreate, RequireContractsDelete, RequireContractsRead, RequireContractsUpdate,
};
use crate::state::AppState;

use super::model::{Contract, CreateContractDto, UpdateContractDto};
use super::service::ContractService;

#[utoipa::path(
    post,
    path = "/api/v1/contracts",
    request_body = CreateContractDto,
    responses(
        (status = 201, description = "Contract created", body = Contract),
        (status = 400, description = "Invalid input or duplicate contract number"),
        (status = 404, description = "Property not found"),
        (status = 403, description = "Forbidden - requires create on contracts")
    ),
    tag = "Contracts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_contract(
    State(state): State<AppState>,
    RequireContractsCreate(_auth_user): RequireContractsCreate,
    Json(dto): Json<CreateContractDto>,
) -> Result<(StatusCode, Json<Contract>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let contract = ContractService::create_contract(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(contract)))
}

#[utoipa::path(
    get,
    path = "/api/v1/contracts",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated contracts with signed document URLs", body = ListResult),
        (status = 403, description = "Forbidden - requires read on contracts")
    ),
    tag = "Contracts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_contracts(
    State(state): State<AppState>,
    RequireContractsRead(_auth_user): RequireContractsRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(
        ContractService::get_contracts(&state.db, &state.storage_config, &params).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/contracts/{id}",
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 200, description = "Contract details", body = Contract),
        (status = 404, description = "Contract not found")
    ),
    tag = "Contracts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_contract(
    State(state): State<AppState>,
    RequireContractsRead(_auth_user): RequireContractsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Contract>, AppError> {
    Ok(Json(ContractService::get_contract_by_id(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/contracts/{id}",
    params(("id" = Uuid, Path, description = "Contract ID")),
    request_body = UpdateContractDto,
    responses(
        (status = 200, description = "Contract updated", body = Contract),
        (status = 404, description = "Contract not found")
    ),
    tag = "Contracts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_contract(
    State(state): State<AppState>,
    RequireContractsUpdate(_auth_user): RequireContractsUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateContractDto>,
) -> Result<Json<Contract>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    Ok(Json(
        ContractService::update_contract(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/contracts/{id}",
    params(("id" = Uuid, Path, description = "Contract ID")),
    responses(
        (status = 204, description = "Contract deleted"),
        (status = 404, description = "Contract not found")
    ),
    tag = "Contracts",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_contract(
    State(state): State<AppState>,
    RequireContractsDelete(_auth_user): RequireContractsDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ContractService::delete_contract(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

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
    RequireClientsCreate, RequireClientsDelete, RequireClientsRead, RequireClientsUpdate,
};
use crate::state::AppState;

use super::model::{Client, CreateClientDto, UpdateClientDto};
use super::service::ClientService;

#[utoipa::path(
    post,
    path = "/api/v1/clients",
    request_body = CreateClientDto,
    responses(
        (status = 201, description = "Client created", body = Client),
        (status = 400, description = "Invalid input or duplicate email"),
        (status = 403, description = "Forbidden - requires create on clients")
    ),
    tag = "Clients",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_client(
    State(state): State<AppState>,
    RequireClientsCreate(_auth_user): RequireClientsCreate,
    Json(dto): Json<CreateClientDto>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let client = ClientService::create_client(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated clients with counts", body = ListResult),
        (status = 403, description = "Forbidden - requires read on clients")
    ),
    tag = "Clients",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_clients(
    State(state): State<AppState>,
    RequireClientsRead(_auth_user): RequireClientsRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(ClientService::get_clients(&state.db, &params).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client details", body = Client),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_client(
    State(state): State<AppState>,
    RequireClientsRead(_auth_user): RequireClientsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Client>, AppError> {
    Ok(Json(ClientService::get_client_by_id(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    request_body = UpdateClientDto,
    responses(
        (status = 200, description = "Client updated", body = Client),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_client(
    State(state): State<AppState>,
    RequireClientsUpdate(_auth_user): RequireClientsUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateClientDto>,
) -> Result<Json<Client>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    Ok(Json(ClientService::update_client(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    params(("id" = Uuid, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted"),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_client(
    State(state): State<AppState>,
    RequireClientsDelete(_auth_user): RequireClientsDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ClientService::delete_client(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

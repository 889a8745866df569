use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde_json::{Value, json};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use propdesk_core::AppError;
use propdesk_core::listing::{ListQuery, ListResult};

use crate::middleware::authorize::{
    RequireRemindersCreate, RequireRemindersDelete, RequireRemindersRead, RequireRemindersUpdate,
};
use crate::state::AppState;
use crate::utils::email::EmailService;

use super::model::{CreateReminderDto, Reminder, UpdateReminderDto};
use super::service::ReminderService;

#[utoipa::path(
    post,
    path = "/api/v1/reminders",
    request_body = CreateReminderDto,
    responses(
        (status = 201, description = "Reminder created", body = Reminder),
        (status = 422, description = "Invalid input"),
        (status = 403, description = "Forbidden - requires create on reminders")
    ),
    tag = "Reminders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_reminder(
    State(state): State<AppState>,
    RequireRemindersCreate(auth_user): RequireRemindersCreate,
    Json(dto): Json<CreateReminderDto>,
) -> Result<(StatusCode, Json<Reminder>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let reminder =
        ReminderService::create_reminder(&state.db, auth_user.user_id()?, dto).await?;

    Ok((StatusCode::CREATED, Json(reminder)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reminders",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated reminders with counts", body = ListResult),
        (status = 403, description = "Forbidden - requires read on reminders")
    ),
    tag = "Reminders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_reminders(
    State(state): State<AppState>,
    RequireRemindersRead(_auth_user): RequireRemindersRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(ReminderService::get_reminders(&state.db, &params).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/reminders/{id}",
    params(("id" = Uuid, Path, description = "Reminder ID")),
    responses(
        (status = 200, description = "Reminder details", body = Reminder),
        (status = 404, description = "Reminder not found")
    ),
    tag = "Reminders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_reminder(
    State(state): State<AppState>,
    RequireRemindersRead(_auth_user): RequireRemindersRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Reminder>, AppError> {
    Ok(Json(ReminderService::get_reminder_by_id(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reminders/{id}",
    params(("id" = Uuid, Path, description = "Reminder ID")),
    request_body = UpdateReminderDto,
    responses(
        (status = 200, description = "Reminder updated", body = Reminder),
        (status = 404, description = "Reminder not found")
    ),
    tag = "Reminders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_reminder(
    State(state): State<AppState>,
    RequireRemindersUpdate(_auth_user): RequireRemindersUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateReminderDto>,
) -> Result<Json<Reminder>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    Ok(Json(
        ReminderService::update_reminder(&state.db, id, dto).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reminders/{id}",
    params(("id" = Uuid, Path, description = "Reminder ID")),
    responses(
        (status = 204, description = "Reminder deleted"),
        (status = 404, description = "Reminder not found")
    ),
    tag = "Reminders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_reminder(
    State(state): State<AppState>,
    RequireRemindersDelete(_auth_user): RequireRemindersDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ReminderService::delete_reminder(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/reminders/notify-due",
    responses(
        (status = 200, description = "Due reminder notifications sent"),
        (status = 403, description = "Forbidden - requires update on reminders")
    ),
    tag = "Reminders",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn notify_due_reminders(
    State(state): State<AppState>,
    RequireRemindersUpdate(_auth_user): RequireRemindersUpdate,
) -> Result<Json<Value>, AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    let notified = ReminderService::notify_due_reminders(&state.db, &email_service).await?;

    Ok(Json(json!({ "notified": notified })))
}

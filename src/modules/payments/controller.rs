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
    RequirePaymentsCreate, RequirePaymentsDelete, RequirePaymentsRead, RequirePaymentsUpdate,
};
use crate::state::AppState;

use super::model::{CreatePaymentDto, Payment, UpdatePaymentDto};
use super::service::PaymentService;

#[utoipa::path(
    post,
    path = "/api/v1/payments",
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment created", body = Payment),
        (status = 400, description = "Invalid input or missing ownership identifier"),
        (status = 403, description = "Forbidden - requires create on payments")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn create_payment(
    State(state): State<AppState>,
    RequirePaymentsCreate(_auth_user): RequirePaymentsCreate,
    Json(dto): Json<CreatePaymentDto>,
) -> Result<(StatusCode, Json<Payment>), AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    let payment = PaymentService::create_payment(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated payments with counts", body = ListResult),
        (status = 403, description = "Forbidden - requires read on payments")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, params))]
pub async fn get_payments(
    State(state): State<AppState>,
    RequirePaymentsRead(_auth_user): RequirePaymentsRead,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResult>, AppError> {
    Ok(Json(PaymentService::get_payments(&state.db, &params).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment details", body = Payment),
        (status = 404, description = "Payment not found")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn get_payment(
    State(state): State<AppState>,
    RequirePaymentsRead(_auth_user): RequirePaymentsRead,
    Path(id): Path<Uuid>,
) -> Result<Json<Payment>, AppError> {
    Ok(Json(PaymentService::get_payment_by_id(&state.db, id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = UpdatePaymentDto,
    responses(
        (status = 200, description = "Payment updated", body = Payment),
        (status = 404, description = "Payment not found")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, dto))]
pub async fn update_payment(
    State(state): State<AppState>,
    RequirePaymentsUpdate(_auth_user): RequirePaymentsUpdate,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdatePaymentDto>,
) -> Result<Json<Payment>, AppError> {
    dto.validate()
        .map_err(|e| AppError::unprocessable(anyhow::anyhow!("{}", e)))?;

    Ok(Json(PaymentService::update_payment(&state.db, id, dto).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 204, description = "Payment deleted"),
        (status = 404, description = "Payment not found")
    ),
    tag = "Payments",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn delete_payment(
    State(state): State<AppState>,
    RequirePaymentsDelete(_auth_user): RequirePaymentsDelete,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    PaymentService::delete_payment(&state.db, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

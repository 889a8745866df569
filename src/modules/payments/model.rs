use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A payment record. Payments can be assigned to a property/user or entered
/// manually; either way at least one ownership identifier (username, email,
/// or owner name) must be present.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Payment {
    pub id: Uuid,
    pub payment_date: chrono::DateTime<chrono::Utc>,
    pub total_amount: f64,
    pub paid_amount: f64,
    pub unpaid_amount: f64,
    pub status: String,
    pub payment_method: String,
    pub property_id: Option<Uuid>,
    pub assigned_type: String,
    pub username: Option<String>,
    pub user_email: Option<String>,
    pub owner_name: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Unpaid => "UNPAID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Binance,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::BankTransfer => "BANK_TRANSFER",
            PaymentMethod::Binance => "BINANCE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignedType {
    Assigned,
    Manual,
}

impl AssignedType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignedType::Assigned => "ASSIGNED",
            AssignedType::Manual => "MANUAL",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentDto {
    pub payment_date: Option<chrono::DateTime<chrono::Utc>>,
    #[validate(range(min = 0.0, message = "Total amount must be non-negative"))]
    pub total_amount: f64,
    #[validate(range(min = 0.0, message = "Paid amount must be non-negative"))]
    pub paid_amount: Option<f64>,
    pub status: Option<PaymentStatus>,
    pub payment_method: PaymentMethod,
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub property_id: Option<Uuid>,
    pub assigned_type: Option<AssignedType>,
    pub username: Option<String>,
    pub user_email: Option<String>,
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentDto {
    pub payment_date: Option<chrono::DateTime<chrono::Utc>>,
    #[validate(range(min = 0.0, message = "Total amount must be non-negative"))]
    pub total_amount: Option<f64>,
    #[validate(range(min = 0.0, message = "Paid amount must be non-negative"))]
    pub paid_amount: Option<f64>,
    pub status: Option<PaymentStatus>,
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub property_id: Option<Uuid>,
    pub assigned_type: Option<AssignedType>,
    pub username: Option<String>,
    pub user_email: Option<String>,
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub user_id: Option<Uuid>,
}

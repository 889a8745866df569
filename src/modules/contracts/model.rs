use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A rental or sale contract over a property. `document_key` addresses the
/// scanned contract file; list responses carry a signed `document_url`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Contract {
    pub id: Uuid,
    pub contract_number: String,
    pub property_id: Uuid,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
    pub contract_type: String,
    pub status: String,
    pub document_key: Option<String>,
    pub amount: f64,
    pub deposit_amount: Option<f64>,
    pub currency: String,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContractType {
    Owner,
    Broker,
    Agency,
}

impl ContractType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractType::Owner => "owner",
            ContractType::Broker => "broker",
            ContractType::Agency => "agency",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    Draft,
    Active,
    Expired,
    Terminated,
    Renewed,
    Cancelled,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "draft",
            ContractStatus::Active => "active",
            ContractStatus::Expired => "expired",
            ContractStatus::Terminated => "terminated",
            ContractStatus::Renewed => "renewed",
            ContractStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateContractDto {
    #[validate(length(min = 1, message = "Contract number is required"))]
    pub contract_number: String,
    pub property_id: Uuid,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: chrono::DateTime<chrono::Utc>,
    pub contract_type: Option<ContractType>,
    pub status: Option<ContractStatus>,
    pub document_key: Option<String>,
    #[validate(range(min = 0.0, message = "Amount must be non-negative"))]
    pub amount: f64,
    #[validate(range(min = 0.0, message = "Deposit must be non-negative"))]
    pub deposit_amount: Option<f64>,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateContractDto {
    pub start_date: Option<chrono::DateTime<chrono::Utc>>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub contract_type: Option<ContractType>,
    pub status: Option<ContractStatus>,
    pub document_key: Option<String>,
    #[validate(range(min = 0.0, message = "Amount must be non-negative"))]
    pub amount: Option<f64>,
    #[validate(range(min = 0.0, message = "Deposit must be non-negative"))]
    pub deposit_amount: Option<f64>,
    pub currency: Option<String>,
    pub notes: Option<String>,
}

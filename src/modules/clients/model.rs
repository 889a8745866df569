use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub use crate::modules::owners::model::ContactStatus;

/// A prospective or current client contact record. Shares the contact
/// vocabulary with owners.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub alternative_phone: Option<String>,
    pub date_of_birth: Option<chrono::DateTime<chrono::Utc>>,
    pub photo: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientDto {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub alternative_phone: Option<String>,
    pub date_of_birth: Option<chrono::DateTime<chrono::Utc>>,
    pub photo: Option<String>,
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateClientDto {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub contact_number: Option<String>,
    pub alternative_phone: Option<String>,
    pub date_of_birth: Option<chrono::DateTime<chrono::Utc>>,
    pub photo: Option<String>,
    pub status: Option<ContactStatus>,
    #[validate(length(max = 2000, message = "Notes must not exceed 2000 characters"))]
    pub notes: Option<String>,
}

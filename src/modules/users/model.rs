use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use propdesk_core::permissions::Role;

/// A back-office user. The password hash never leaves the service layer;
/// it is not part of this struct.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub nickname: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_of_birth: Option<chrono::DateTime<chrono::Utc>>,
    pub photo: Option<String>,
    pub role: String,
    pub contact_number: Option<String>,
    pub alternative_phone: Option<String>,
    pub status: String,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub banned_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Internal row used by authentication; carries the password hash.
#[derive(Debug, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub first_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 10, message = "Nickname must be between 3 and 10 characters"))]
    pub nickname: Option<String>,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub date_of_birth: Option<chrono::DateTime<chrono::Utc>>,
    pub photo: Option<String>,
    /// Defaults to guest when omitted
    pub role: Option<Role>,
    pub contact_number: Option<String>,
    pub alternative_phone: Option<String>,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(length(min = 3, max = 10, message = "Nickname must be between 3 and 10 characters"))]
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub date_of_birth: Option<chrono::DateTime<chrono::Utc>>,
    pub photo: Option<String>,
    pub role: Option<Role>,
    pub contact_number: Option<String>,
    pub alternative_phone: Option<String>,
}

/// Status transition payload for the ban/unban endpoint.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserStatusDto {
    pub status: UserStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Banned,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Banned => "banned",
        }
    }
}

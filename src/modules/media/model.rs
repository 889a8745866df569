use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A media record attached to a property. `file_key` addresses the stored
/// file; clients only ever see signed URLs derived from it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PropertyMedia {
    pub id: Uuid,
    pub property_id: Uuid,
    pub media_type: String,
    pub file_key: String,
    pub is_primary: Option<bool>,
    pub display_order: i32,
    pub caption: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A media record plus its signed delivery URL.
#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyMediaWithUrl {
    #[serde(flatten)]
    pub media: PropertyMedia,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMediaDto {
    pub property_id: Uuid,
    pub media_type: MediaType,
    #[validate(length(min = 1, message = "File key is required"))]
    pub file_key: String,
    pub is_primary: Option<bool>,
    pub display_order: i32,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateMediaDto {
    pub is_primary: Option<bool>,
    pub display_order: Option<i32>,
    pub caption: Option<String>,
}

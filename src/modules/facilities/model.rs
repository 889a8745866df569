use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Building facilities of a property (one record per property).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PropertyFacility {
    pub id: Uuid,
    pub property_id: Uuid,
    pub elevator: Option<bool>,
    pub electricity: Option<bool>,
    pub parking: Option<i32>,
    pub visitor_parking: Option<i32>,
    pub gym: Option<bool>,
    pub pool: Option<bool>,
    pub sauna: Option<bool>,
    pub kids_area: Option<bool>,
    pub garden: Option<bool>,
    pub executive_lounge: Option<bool>,
    pub full_time_concierge: Option<bool>,
    pub full_time_security: Option<bool>,
    pub other_facilities: Option<Vec<String>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFacilityDto {
    pub property_id: Uuid,
    pub elevator: Option<bool>,
    pub electricity: Option<bool>,
    pub parking: Option<i32>,
    pub visitor_parking: Option<i32>,
    pub gym: Option<bool>,
    pub pool: Option<bool>,
    pub sauna: Option<bool>,
    pub kids_area: Option<bool>,
    pub garden: Option<bool>,
    pub executive_lounge: Option<bool>,
    pub full_time_concierge: Option<bool>,
    pub full_time_security: Option<bool>,
    pub other_facilities: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFacilityDto {
    pub elevator: Option<bool>,
    pub electricity: Option<bool>,
    pub parking: Option<i32>,
    pub visitor_parking: Option<i32>,
    pub gym: Option<bool>,
    pub pool: Option<bool>,
    pub sauna: Option<bool>,
    pub kids_area: Option<bool>,
    pub garden: Option<bool>,
    pub executive_lounge: Option<bool>,
    pub full_time_concierge: Option<bool>,
    pub full_time_security: Option<bool>,
    pub other_facilities: Option<Vec<String>>,
}

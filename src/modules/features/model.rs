use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Interior features of a property (one record per property).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PropertyFeature {
    pub id: Uuid,
    pub property_id: Uuid,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub master_bedrooms: Option<i32>,
    pub kitchen: Option<bool>,
    pub living_room: Option<bool>,
    pub dining_room: Option<bool>,
    pub maids_room: Option<bool>,
    pub balcony: Option<bool>,
    pub balcony_size: Option<f64>,
    pub building_age: Option<i32>,
    pub total_floors: Option<i32>,
    pub apartments_per_floor: Option<i32>,
    /// Free-form extras that never made it into the schema
    pub other_features: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFeatureDto {
    pub property_id: Uuid,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub master_bedrooms: Option<i32>,
    pub kitchen: Option<bool>,
    pub living_room: Option<bool>,
    pub dining_room: Option<bool>,
    pub maids_room: Option<bool>,
    pub balcony: Option<bool>,
    pub balcony_size: Option<f64>,
    pub building_age: Option<i32>,
    pub total_floors: Option<i32>,
    pub apartments_per_floor: Option<i32>,
    pub other_features: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFeatureDto {
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub master_bedrooms: Option<i32>,
    pub kitchen: Option<bool>,
    pub living_room: Option<bool>,
    pub dining_room: Option<bool>,
    pub maids_room: Option<bool>,
    pub balcony: Option<bool>,
    pub balcony_size: Option<f64>,
    pub building_age: Option<i32>,
    pub total_floors: Option<i32>,
    pub apartments_per_floor: Option<i32>,
    pub other_features: Option<serde_json::Value>,
}

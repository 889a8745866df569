use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A listed property, with owner/broker names joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Property {
    pub id: Uuid,
    pub reference_id: String,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Option<Uuid>,
    pub broker_id: Option<Uuid>,
    pub owner_first_name: Option<String>,
    pub owner_last_name: Option<String>,
    pub broker_first_name: Option<String>,
    pub broker_last_name: Option<String>,
    pub category: String,
    pub other_category: Option<String>,
    pub parent_property_id: Option<Uuid>,
    pub listing_type: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: String,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub size_value: f64,
    pub size_unit: String,
    pub floor: Option<i32>,
    pub sale_amount: Option<f64>,
    pub sale_currency: String,
    pub sale_negotiable: bool,
    pub rent_amount: Option<f64>,
    pub rent_currency: String,
    pub rent_period: String,
    pub rent_negotiable: bool,
    pub furnishing: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyCategory {
    Apartment,
    Shop,
    Office,
    Land,
    Warehouse,
    Villa,
    House,
    Building,
    Loft,
    Tower,
    Penthouse,
    Other,
}

impl PropertyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyCategory::Apartment => "apartment",
            PropertyCategory::Shop => "shop",
            PropertyCategory::Office => "office",
            PropertyCategory::Land => "land",
            PropertyCategory::Warehouse => "warehouse",
            PropertyCategory::Villa => "villa",
            PropertyCategory::House => "house",
            PropertyCategory::Building => "building",
            PropertyCategory::Loft => "loft",
            PropertyCategory::Tower => "tower",
            PropertyCategory::Penthouse => "penthouse",
            PropertyCategory::Other => "other",
        }
    }

    /// Buildings and towers are containers; they can hold units but can
    /// never themselves be a child unit.
    pub fn is_container(&self) -> bool {
        matches!(self, PropertyCategory::Building | PropertyCategory::Tower)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Rent,
    Sale,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Rent => "rent",
            ListingType::Sale => "sale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    Available,
    Pending,
    Archived,
    Sold,
    Rented,
    Banned,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Archived => "archived",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Rented => "rented",
            PropertyStatus::Banned => "banned",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePropertyDto {
    #[validate(length(min = 1, message = "Reference ID is required"))]
    pub reference_id: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    // Form clients send "" for unselected owner/broker dropdowns
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub owner_id: Option<Uuid>,
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub broker_id: Option<Uuid>,
    pub category: PropertyCategory,
    pub other_category: Option<String>,
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub parent_property_id: Option<Uuid>,
    pub listing_type: ListingType,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    #[validate(range(min = -180.0, max = 180.0, message = "Invalid longitude"))]
    pub longitude: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0, message = "Invalid latitude"))]
    pub latitude: Option<f64>,
    #[validate(range(min = 0.0, message = "Size must be non-negative"))]
    pub size_value: f64,
    pub floor: Option<i32>,
    #[validate(range(min = 0.0, message = "Sale amount must be non-negative"))]
    pub sale_amount: Option<f64>,
    pub sale_currency: Option<String>,
    pub sale_negotiable: Option<bool>,
    #[validate(range(min = 0.0, message = "Rent amount must be non-negative"))]
    pub rent_amount: Option<f64>,
    pub rent_currency: Option<String>,
    pub rent_period: Option<String>,
    pub rent_negotiable: Option<bool>,
    pub furnishing: Option<String>,
    pub status: Option<PropertyStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePropertyDto {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub owner_id: Option<Uuid>,
    #[serde(default, deserialize_with = "propdesk_core::serde::deserialize_optional_uuid")]
    pub broker_id: Option<Uuid>,
    pub other_category: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    #[validate(range(min = -180.0, max = 180.0, message = "Invalid longitude"))]
    pub longitude: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0, message = "Invalid latitude"))]
    pub latitude: Option<f64>,
    #[validate(range(min = 0.0, message = "Size must be non-negative"))]
    pub size_value: Option<f64>,
    pub floor: Option<i32>,
    #[validate(range(min = 0.0, message = "Sale amount must be non-negative"))]
    pub sale_amount: Option<f64>,
    pub sale_currency: Option<String>,
    pub sale_negotiable: Option<bool>,
    #[validate(range(min = 0.0, message = "Rent amount must be non-negative"))]
    pub rent_amount: Option<f64>,
    pub rent_currency: Option<String>,
    pub rent_period: Option<String>,
    pub rent_negotiable: Option<bool>,
    pub furnishing: Option<String>,
    pub status: Option<PropertyStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PropertyStatusDto {
    pub status: PropertyStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_categories() {
        assert!(PropertyCategory::Building.is_container());
        assert!(PropertyCategory::Tower.is_container());
        assert!(!PropertyCategory::Apartment.is_container());
        assert!(!PropertyCategory::Penthouse.is_container());
    }

    #[test]
    fn test_category_deserializes_lowercase() {
        let cat: PropertyCategory = serde_json::from_str("\"villa\"").unwrap();
        assert_eq!(cat, PropertyCategory::Villa);
        assert!(serde_json::from_str::<PropertyCategory>("\"castle\"").is_err());
    }
}

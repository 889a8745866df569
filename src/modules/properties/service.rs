use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::listing::{
    Collection, FieldKind, FilterField, ListResult, Repository, list_documents,
};

use crate::config::storage::StorageConfig;
use crate::modules::media::service::media_for_properties;

use super::model::{CreatePropertyDto, Property, PropertyStatus, UpdatePropertyDto};

const PROPERTY_SELECT: &str =
    "SELECT p.id, p.reference_id, p.title, p.description, p.owner_id, p.broker_id, \
     o.first_name AS owner_first_name, o.last_name AS owner_last_name, \
     b.first_name AS broker_first_name, b.last_name AS broker_last_name, \
     p.category, p.other_category, p.parent_property_id, p.listing_type, \
     p.city, p.state, p.zip_code, p.country, p.longitude, p.latitude, \
     p.size_value, p.size_unit, p.floor, \
     p.sale_amount, p.sale_currency, p.sale_negotiable, \
     p.rent_amount, p.rent_currency, p.rent_period, p.rent_negotiable, \
     p.furnishing, p.status, p.created_at, p.updated_at \
     FROM properties p \
     LEFT JOIN users o ON o.id = p.owner_id \
     LEFT JOIN users b ON b.id = p.broker_id";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("reference_id", "p.reference_id", FieldKind::Text),
    FilterField::new("title", "p.title", FieldKind::Text),
    FilterField::new("category", "p.category", FieldKind::Text),
    FilterField::new("listing_type", "p.listing_type", FieldKind::Text),
    FilterField::new("city", "p.city", FieldKind::Text),
    FilterField::new("state", "p.state", FieldKind::Text),
    FilterField::new("country", "p.country", FieldKind::Text),
    FilterField::new("status", "p.status", FieldKind::Text),
    FilterField::new("furnishing", "p.furnishing", FieldKind::Text),
    FilterField::new("owner_id", "p.owner_id", FieldKind::Uuid),
    FilterField::new("broker_id", "p.broker_id", FieldKind::Uuid),
    FilterField::new("parent_property_id", "p.parent_property_id", FieldKind::Uuid),
    FilterField::new("floor", "p.floor", FieldKind::Int),
    FilterField::new("size_value", "p.size_value", FieldKind::Float),
    FilterField::new("sale_amount", "p.sale_amount", FieldKind::Float),
    FilterField::new("rent_amount", "p.rent_amount", FieldKind::Float),
    FilterField::new("created_at", "p.created_at", FieldKind::Timestamp),
];

const PROPERTIES: Collection = Collection {
    resource: "properties",
    select: PROPERTY_SELECT,
    count_from: "properties p",
    soft_delete: None,
    filterable: FILTERABLE,
    searchable: &[
        "p.title",
        "p.category",
        "p.status",
        "p.city",
        "p.state",
        "p.country",
        "p.listing_type",
    ],
};

/// Property repository; the enrichment hook attaches each page row's media
/// with signed URLs.
struct PropertyRepo<'a> {
    storage: &'a StorageConfig,
}

impl Repository for PropertyRepo<'_> {
    fn collection(&self) -> &Collection {
        &PROPERTIES
    }

    fn enrich<'a>(
        &'a self,
        db: &'a PgPool,
        mut rows: Vec<Value>,
    ) -> BoxFuture<'a, Result<Vec<Value>, AppError>> {
        Box::pin(async move {
            let ids: Vec<Uuid> = rows
                .iter()
                .filter_map(|row| row.get("id"))
                .filter_map(Value::as_str)
                .filter_map(|s| Uuid::parse_str(s).ok())
                .collect();
            if ids.is_empty() {
                return Ok(rows);
            }

            let mut media = media_for_properties(db, self.storage, &ids).await?;

            for row in rows.iter_mut() {
                if let Value::Object(map) = row {
                    let attached = map
                        .get("id")
                        .and_then(Value::as_str)
                        .and_then(|s| Uuid::parse_str(s).ok())
                        .and_then(|id| media.remove(&id))
                        .unwrap_or_default();
                    map.insert("media".to_string(), Value::Array(attached));
                }
            }
            Ok(rows)
        })
    }
}

pub struct PropertyService;

impl PropertyService {
    #[instrument(skip(db, dto), fields(property.reference_id = %dto.reference_id, db.table = "properties"))]
    pub async fn create_property(db: &PgPool, dto: CreatePropertyDto) -> Result<Property, AppError> {
        // Containers hold units; they can never be a child themselves
        if dto.parent_property_id.is_some() && dto.category.is_container() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Buildings or towers cannot be child units"
            )));
        }

        let property = sqlx::query_as::<_, Property>(
            "WITH inserted AS (
                 INSERT INTO properties \
                 (reference_id, title, description, owner_id, broker_id, category, other_category, \
                  parent_property_id, listing_type, city, state, zip_code, country, longitude, latitude, \
                  size_value, floor, sale_amount, sale_currency, sale_negotiable, \
                  rent_amount, rent_currency, rent_period, rent_negotiable, furnishing, status) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
                         COALESCE($13, 'Lebanon'), $14, $15, $16, $17, $18, \
                         COALESCE($19, 'USD'), COALESCE($20, FALSE), $21, COALESCE($22, 'USD'), \
                         COALESCE($23, 'month'), COALESCE($24, FALSE), \
                         COALESCE($25, 'unfurnished'), COALESCE($26, 'available')) \
                 RETURNING *
             )
             SELECT p.id, p.reference_id, p.title, p.description, p.owner_id, p.broker_id, \
                    o.first_name AS owner_first_name, o.last_name AS owner_last_name, \
                    b.first_name AS broker_first_name, b.last_name AS broker_last_name, \
                    p.category, p.other_category, p.parent_property_id, p.listing_type, \
                    p.city, p.state, p.zip_code, p.country, p.longitude, p.latitude, \
                    p.size_value, p.size_unit, p.floor, \
                    p.sale_amount, p.sale_currency, p.sale_negotiable, \
                    p.rent_amount, p.rent_currency, p.rent_period, p.rent_negotiable, \
                    p.furnishing, p.status, p.created_at, p.updated_at \
             FROM inserted p \
             LEFT JOIN users o ON o.id = p.owner_id \
             LEFT JOIN users b ON b.id = p.broker_id",
        )
        .bind(&dto.reference_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.owner_id)
        .bind(dto.broker_id)
        .bind(dto.category.as_str())
        .bind(&dto.other_category)
        .bind(dto.parent_property_id)
        .bind(dto.listing_type.as_str())
        .bind(&dto.city)
        .bind(&dto.state)
        .bind(&dto.zip_code)
        .bind(&dto.country)
        .bind(dto.longitude)
        .bind(dto.latitude)
        .bind(dto.size_value)
        .bind(dto.floor)
        .bind(dto.sale_amount)
        .bind(&dto.sale_currency)
        .bind(dto.sale_negotiable)
        .bind(dto.rent_amount)
        .bind(&dto.rent_currency)
        .bind(&dto.rent_period)
        .bind(dto.rent_negotiable)
        .bind(&dto.furnishing)
        .bind(dto.status.map(|s| s.as_str()))
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(property.reference_id = %dto.reference_id, "Duplicate reference ID");
                return AppError::bad_request(anyhow::anyhow!(
                    "Property reference ID already exists"
                ));
            }
            error!(error = %e, "Database error creating property");
            AppError::database(e)
        })?;

        info!(property.id = %property.id, "Property created");
        Ok(property)
    }

    #[instrument(skip(db, storage, params), fields(db.table = "properties"))]
    pub async fn get_properties(
        db: &PgPool,
        storage: &StorageConfig,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<Property, _>(db, &PropertyRepo { storage }, params).await
    }

    #[instrument(skip(db), fields(property.id = %id, db.table = "properties"))]
    pub async fn get_property_by_id(db: &PgPool, id: Uuid) -> Result<Property, AppError> {
        sqlx::query_as::<_, Property>(&format!("{} WHERE p.id = $1", PROPERTY_SELECT))
            .bind(id)
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, property.id = %id, "Database error fetching property");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Property not found")))
    }

    #[instrument(skip(db, dto), fields(property.id = %id, db.table = "properties"))]
    pub async fn update_property(
        db: &PgPool,
        id: Uuid,
        dto: UpdatePropertyDto,
    ) -> Result<Property, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE properties SET updated_at = now()");

        if let Some(title) = dto.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = dto.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(owner_id) = dto.owner_id {
            qb.push(", owner_id = ").push_bind(owner_id);
        }
        if let Some(broker_id) = dto.broker_id {
            qb.push(", broker_id = ").push_bind(broker_id);
        }
        if let Some(other_category) = dto.other_category {
            qb.push(", other_category = ").push_bind(other_category);
        }
        if let Some(city) = dto.city {
            qb.push(", city = ").push_bind(city);
        }
        if let Some(state) = dto.state {
            qb.push(", state = ").push_bind(state);
        }
        if let Some(zip_code) = dto.zip_code {
            qb.push(", zip_code = ").push_bind(zip_code);
        }
        if let Some(country) = dto.country {
            qb.push(", country = ").push_bind(country);
        }
        if let Some(longitude) = dto.longitude {
            qb.push(", longitude = ").push_bind(longitude);
        }
        if let Some(latitude) = dto.latitude {
            qb.push(", latitude = ").push_bind(latitude);
        }
        if let Some(size_value) = dto.size_value {
            qb.push(", size_value = ").push_bind(size_value);
        }
        if let Some(floor) = dto.floor {
            qb.push(", floor = ").push_bind(floor);
        }
        if let Some(sale_amount) = dto.sale_amount {
            qb.push(", sale_amount = ").push_bind(sale_amount);
        }
        if let Some(sale_currency) = dto.sale_currency {
            qb.push(", sale_currency = ").push_bind(sale_currency);
        }
        if let Some(sale_negotiable) = dto.sale_negotiable {
            qb.push(", sale_negotiable = ").push_bind(sale_negotiable);
        }
        if let Some(rent_amount) = dto.rent_amount {
            qb.push(", rent_amount = ").push_bind(rent_amount);
        }
        if let Some(rent_currency) = dto.rent_currency {
            qb.push(", rent_currency = ").push_bind(rent_currency);
        }
        if let Some(rent_period) = dto.rent_period {
            qb.push(", rent_period = ").push_bind(rent_period);
        }
        if let Some(rent_negotiable) = dto.rent_negotiable {
            qb.push(", rent_negotiable = ").push_bind(rent_negotiable);
        }
        if let Some(furnishing) = dto.furnishing {
            qb.push(", furnishing = ").push_bind(furnishing);
        }
        if let Some(status) = dto.status {
            qb.push(", status = ").push_bind(status.as_str());
        }

        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(db).await.map_err(|e| {
            error!(error = %e, property.id = %id, "Database error updating property");
            AppError::database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Property not found")));
        }

        info!(property.id = %id, "Property updated");
        Self::get_property_by_id(db, id).await
    }

    #[instrument(skip(db), fields(property.id = %id, db.table = "properties"))]
    pub async fn delete_property(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, property.id = %id, "Database error deleting property");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Property not found")));
        }

        info!(property.id = %id, "Property deleted");
        Ok(())
    }

    #[instrument(skip(db), fields(property.id = %id, db.table = "properties"))]
    pub async fn set_property_status(
        db: &PgPool,
        id: Uuid,
        status: PropertyStatus,
    ) -> Result<Property, AppError> {
        let result = sqlx::query("UPDATE properties SET status = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, property.id = %id, "Database error updating property status");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Property not found")));
        }

        info!(property.id = %id, status = %status.as_str(), "Property status changed");
        Self::get_property_by_id(db, id).await
    }
}

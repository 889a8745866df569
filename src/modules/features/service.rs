use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::listing::{
    Collection, FieldKind, FilterField, ListResult, Repository, list_documents,
};

use super::model::{CreateFeatureDto, PropertyFeature, UpdateFeatureDto};

const FEATURE_COLUMNS: &str =
    "id, property_id, bedrooms, bathrooms, master_bedrooms, kitchen, living_room, dining_room, \
     maids_room, balcony, balcony_size, building_age, total_floors, apartments_per_floor, \
     other_features, created_at, updated_at";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("property_id", "property_id", FieldKind::Uuid),
    FilterField::new("bedrooms", "bedrooms", FieldKind::Int),
    FilterField::new("bathrooms", "bathrooms", FieldKind::Int),
    FilterField::new("balcony", "balcony", FieldKind::Bool),
    FilterField::new("building_age", "building_age", FieldKind::Int),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

// Feature records carry no text worth keyword-searching.
const FEATURES: Collection = Collection {
    resource: "features",
    select: "SELECT id, property_id, bedrooms, bathrooms, master_bedrooms, kitchen, living_room, \
             dining_room, maids_room, balcony, balcony_size, building_age, total_floors, \
             apartments_per_floor, other_features, created_at, updated_at FROM property_features",
    count_from: "property_features",
    soft_delete: None,
    filterable: FILTERABLE,
    searchable: &[],
};

struct FeatureRepo;

impl Repository for FeatureRepo {
    fn collection(&self) -> &Collection {
        &FEATURES
    }
}

pub struct FeatureService;

impl FeatureService {
    #[instrument(skip(db, dto), fields(property.id = %dto.property_id, db.table = "property_features"))]
    pub async fn create_feature(
        db: &PgPool,
        dto: CreateFeatureDto,
    ) -> Result<PropertyFeature, AppError> {
        let feature = sqlx::query_as::<_, PropertyFeature>(&format!(
            "INSERT INTO property_features \
             (property_id, bedrooms, bathrooms, master_bedrooms, kitchen, living_room, dining_room, \
              maids_room, balcony, balcony_size, building_age, total_floors, apartments_per_floor, other_features) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {}",
            FEATURE_COLUMNS
        ))
        .bind(dto.property_id)
        .bind(dto.bedrooms)
        .bind(dto.bathrooms)
        .bind(dto.master_bedrooms)
        .bind(dto.kitchen)
        .bind(dto.living_room)
        .bind(dto.dining_room)
        .bind(dto.maids_room)
        .bind(dto.balcony)
        .bind(dto.balcony_size)
        .bind(dto.building_age)
        .bind(dto.total_floors)
        .bind(dto.apartments_per_floor)
        .bind(dto.other_features)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(property.id = %dto.property_id, "Property already has a feature record");
                    return AppError::bad_request(anyhow::anyhow!(
                        "A feature record already exists for this property"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::not_found(anyhow::anyhow!("Property not found"));
                }
            }
            error!(error = %e, "Database error creating feature record");
            AppError::database(e)
        })?;

        info!(feature.id = %feature.id, "Feature record created");
        Ok(feature)
    }

    #[instrument(skip(db, params), fields(db.table = "property_features"))]
    pub async fn get_features(
        db: &PgPool,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<PropertyFeature, _>(db, &FeatureRepo, params).await
    }

    #[instrument(skip(db), fields(db.table = "property_features"))]
    pub async fn get_feature_by_id(db: &PgPool, id: Uuid) -> Result<PropertyFeature, AppError> {
        sqlx::query_as::<_, PropertyFeature>(&format!(
            "SELECT {} FROM property_features WHERE id = $1",
            FEATURE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, feature.id = %id, "Database error fetching feature record");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Feature record not found")))
    }

    #[instrument(skip(db), fields(property.id = %property_id, db.table = "property_features"))]
    pub async fn get_feature_by_property(
        db: &PgPool,
        property_id: Uuid,
    ) -> Result<PropertyFeature, AppError> {
        sqlx::query_as::<_, PropertyFeature>(&format!(
            "SELECT {} FROM property_features WHERE property_id = $1",
            FEATURE_COLUMNS
        ))
        .bind(property_id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, property.id = %property_id, "Database error fetching feature record");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Feature record not found")))
    }

    #[instrument(skip(db, dto), fields(feature.id = %id, db.table = "property_features"))]
    pub async fn update_feature(
        db: &PgPool,
        id: Uuid,
        dto: UpdateFeatureDto,
    ) -> Result<PropertyFeature, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE property_features SET updated_at = now()");

        if let Some(bedrooms) = dto.bedrooms {
            qb.push(", bedrooms = ").push_bind(bedrooms);
        }
        if let Some(bathrooms) = dto.bathrooms {
            qb.push(", bathrooms = ").push_bind(bathrooms);
        }
        if let Some(master_bedrooms) = dto.master_bedrooms {
            qb.push(", master_bedrooms = ").push_bind(master_bedrooms);
        }
        if let Some(kitchen) = dto.kitchen {
            qb.push(", kitchen = ").push_bind(kitchen);
        }
        if let Some(living_room) = dto.living_room {
            qb.push(", living_room = ").push_bind(living_room);
        }
        if let Some(dining_room) = dto.dining_room {
            qb.push(", dining_room = ").push_bind(dining_room);
        }
        if let Some(maids_room) = dto.maids_room {
            qb.push(", maids_room = ").push_bind(maids_room);
        }
        if let Some(balcony) = dto.balcony {
            qb.push(", balcony = ").push_bind(balcony);
        }
        if let Some(balcony_size) = dto.balcony_size {
            qb.push(", balcony_size = ").push_bind(balcony_size);
        }
        if let Some(building_age) = dto.building_age {
            qb.push(", building_age = ").push_bind(building_age);
        }
        if let Some(total_floors) = dto.total_floors {
            qb.push(", total_floors = ").push_bind(total_floors);
        }
        if let Some(apartments_per_floor) = dto.apartments_per_floor {
            qb.push(", apartments_per_floor = ").push_bind(apartments_per_floor);
        }
        if let Some(other_features) = dto.other_features {
            qb.push(", other_features = ").push_bind(other_features);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ");
        qb.push(FEATURE_COLUMNS);

        let feature = qb
            .build_query_as::<PropertyFeature>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, feature.id = %id, "Database error updating feature record");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Feature record not found")))?;

        info!(feature.id = %id, "Feature record updated");
        Ok(feature)
    }

    #[instrument(skip(db), fields(feature.id = %id, db.table = "property_features"))]
    pub async fn delete_feature(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM property_features WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, feature.id = %id, "Database error deleting feature record");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Feature record not found"
            )));
        }

        info!(feature.id = %id, "Feature record deleted");
        Ok(())
    }
}

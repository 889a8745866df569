use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::listing::{
    Collection, FieldKind, FilterField, ListResult, Repository, list_documents,
};

use super::model::{CreateFacilityDto, PropertyFacility, UpdateFacilityDto};

const FACILITY_COLUMNS: &str =
    "id, property_id, elevator, electricity, parking, visitor_parking, gym, pool, sauna, \
     kids_area, garden, executive_lounge, full_time_concierge, full_time_security, \
     other_facilities, created_at, updated_at";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("property_id", "property_id", FieldKind::Uuid),
    FilterField::new("elevator", "elevator", FieldKind::Bool),
    FilterField::new("gym", "gym", FieldKind::Bool),
    FilterField::new("pool", "pool", FieldKind::Bool),
    FilterField::new("parking", "parking", FieldKind::Int),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

const FACILITIES: Collection = Collection {
    resource: "facilities",
    select: "SELECT id, property_id, elevator, electricity, parking, visitor_parking, gym, pool, \
             sauna, kids_area, garden, executive_lounge, full_time_concierge, full_time_security, \
             other_facilities, created_at, updated_at FROM property_facilities",
    count_from: "property_facilities",
    soft_delete: None,
    filterable: FILTERABLE,
    searchable: &[],
};

struct FacilityRepo;

impl Repository for FacilityRepo {
    fn collection(&self) -> &Collection {
        &FACILITIES
    }
}

pub struct FacilityService;

impl FacilityService {
    #[instrument(skip(db, dto), fields(property.id = %dto.property_id, db.table = "property_facilities"))]
    pub async fn create_facility(
        db: &PgPool,
        dto: CreateFacilityDto,
    ) -> Result<PropertyFacility, AppError> {
        let facility = sqlx::query_as::<_, PropertyFacility>(&format!(
            "INSERT INTO property_facilities \
             (property_id, elevator, electricity, parking, visitor_parking, gym, pool, sauna, \
              kids_area, garden, executive_lounge, full_time_concierge, full_time_security, other_facilities) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {}",
            FACILITY_COLUMNS
        ))
        .bind(dto.property_id)
        .bind(dto.elevator)
        .bind(dto.electricity)
        .bind(dto.parking)
        .bind(dto.visitor_parking)
        .bind(dto.gym)
        .bind(dto.pool)
        .bind(dto.sauna)
        .bind(dto.kids_area)
        .bind(dto.garden)
        .bind(dto.executive_lounge)
        .bind(dto.full_time_concierge)
        .bind(dto.full_time_security)
        .bind(dto.other_facilities)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(property.id = %dto.property_id, "Property already has a facility record");
                    return AppError::bad_request(anyhow::anyhow!(
                        "A facility record already exists for this property"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::not_found(anyhow::anyhow!("Property not found"));
                }
            }
            error!(error = %e, "Database error creating facility record");
            AppError::database(e)
        })?;

        info!(facility.id = %facility.id, "Facility record created");
        Ok(facility)
    }

    #[instrument(skip(db, params), fields(db.table = "property_facilities"))]
    pub async fn get_facilities(
        db: &PgPool,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<PropertyFacility, _>(db, &FacilityRepo, params).await
    }

    #[instrument(skip(db), fields(db.table = "property_facilities"))]
    pub async fn get_facility_by_id(db: &PgPool, id: Uuid) -> Result<PropertyFacility, AppError> {
        sqlx::query_as::<_, PropertyFacility>(&format!(
            "SELECT {} FROM property_facilities WHERE id = $1",
            FACILITY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, facility.id = %id, "Database error fetching facility record");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Facility record not found")))
    }

    #[instrument(skip(db), fields(property.id = %property_id, db.table = "property_facilities"))]
    pub async fn get_facility_by_property(
        db: &PgPool,
        property_id: Uuid,
    ) -> Result<PropertyFacility, AppError> {
        sqlx::query_as::<_, PropertyFacility>(&format!(
            "SELECT {} FROM property_facilities WHERE property_id = $1",
            FACILITY_COLUMNS
        ))
        .bind(property_id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, property.id = %property_id, "Database error fetching facility record");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Facility record not found")))
    }

    #[instrument(skip(db, dto), fields(facility.id = %id, db.table = "property_facilities"))]
    pub async fn update_facility(
        db: &PgPool,
        id: Uuid,
        dto: UpdateFacilityDto,
    ) -> Result<PropertyFacility, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE property_facilities SET updated_at = now()");

        if let Some(elevator) = dto.elevator {
            qb.push(", elevator = ").push_bind(elevator);
        }
        if let Some(electricity) = dto.electricity {
            qb.push(", electricity = ").push_bind(electricity);
        }
        if let Some(parking) = dto.parking {
            qb.push(", parking = ").push_bind(parking);
        }
        if let Some(visitor_parking) = dto.visitor_parking {
            qb.push(", visitor_parking = ").push_bind(visitor_parking);
        }
        if let Some(gym) = dto.gym {
            qb.push(", gym = ").push_bind(gym);
        }
        if let Some(pool) = dto.pool {
            qb.push(", pool = ").push_bind(pool);
        }
        if let Some(sauna) = dto.sauna {
            qb.push(", sauna = ").push_bind(sauna);
        }
        if let Some(kids_area) = dto.kids_area {
            qb.push(", kids_area = ").push_bind(kids_area);
        }
        if let Some(garden) = dto.garden {
            qb.push(", garden = ").push_bind(garden);
        }
        if let Some(executive_lounge) = dto.executive_lounge {
            qb.push(", executive_lounge = ").push_bind(executive_lounge);
        }
        if let Some(full_time_concierge) = dto.full_time_concierge {
            qb.push(", full_time_concierge = ").push_bind(full_time_concierge);
        }
        if let Some(full_time_security) = dto.full_time_security {
            qb.push(", full_time_security = ").push_bind(full_time_security);
        }
        if let Some(other_facilities) = dto.other_facilities {
            qb.push(", other_facilities = ").push_bind(other_facilities);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ");
        qb.push(FACILITY_COLUMNS);

        let facility = qb
            .build_query_as::<PropertyFacility>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, facility.id = %id, "Database error updating facility record");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Facility record not found")))?;

        info!(facility.id = %id, "Facility record updated");
        Ok(facility)
    }

    #[instrument(skip(db), fields(facility.id = %id, db.table = "property_facilities"))]
    pub async fn delete_facility(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM property_facilities WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, facility.id = %id, "Database error deleting facility record");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Facility record not found"
            )));
        }

        info!(facility.id = %id, "Facility record deleted");
        Ok(())
    }
}

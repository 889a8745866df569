use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::listing::{
    Collection, FieldKind, FilterField, ListResult, Repository, list_documents,
};

use super::model::{CreateOwnerDto, Owner, UpdateOwnerDto};

const OWNER_COLUMNS: &str =
    "id, first_name, last_name, email, contact_number, alternative_phone, date_of_birth, \
     photo, status, notes, created_at, updated_at";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("first_name", "first_name", FieldKind::Text),
    FilterField::new("last_name", "last_name", FieldKind::Text),
    FilterField::new("email", "email", FieldKind::Text),
    FilterField::new("status", "status", FieldKind::Text),
    FilterField::new("contact_number", "contact_number", FieldKind::Text),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

const OWNERS: Collection = Collection {
    resource: "owners",
    select: "SELECT id, first_name, last_name, email, contact_number, alternative_phone, \
             date_of_birth, photo, status, notes, created_at, updated_at FROM owners",
    count_from: "owners",
    soft_delete: Some("status <> 'deleted'"),
    filterable: FILTERABLE,
    searchable: &[
        "first_name",
        "last_name",
        "email",
        "contact_number",
        "alternative_phone",
        "status",
    ],
};

struct OwnerRepo;

impl Repository for OwnerRepo {
    fn collection(&self) -> &Collection {
        &OWNERS
    }
}

pub struct OwnerService;

impl OwnerService {
    #[instrument(skip(db, dto), fields(db.table = "owners"))]
    pub async fn create_owner(db: &PgPool, dto: CreateOwnerDto) -> Result<Owner, AppError> {
        let owner = sqlx::query_as::<_, Owner>(&format!(
            "INSERT INTO owners \
             (first_name, last_name, email, contact_number, alternative_phone, date_of_birth, photo, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            OWNER_COLUMNS
        ))
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.email.as_ref().map(|e| e.to_lowercase()))
        .bind(&dto.contact_number)
        .bind(&dto.alternative_phone)
        .bind(dto.date_of_birth)
        .bind(&dto.photo)
        .bind(&dto.notes)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!("Duplicate owner email");
                return AppError::bad_request(anyhow::anyhow!(
                    "An owner with this email already exists"
                ));
            }
            error!(error = %e, "Database error creating owner");
            AppError::database(e)
        })?;

        info!(owner.id = %owner.id, "Owner created");
        Ok(owner)
    }

    #[instrument(skip(db, params), fields(db.table = "owners"))]
    pub async fn get_owners(
        db: &PgPool,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<Owner, _>(db, &OwnerRepo, params).await
    }

    #[instrument(skip(db), fields(owner.id = %id, db.table = "owners"))]
    pub async fn get_owner_by_id(db: &PgPool, id: Uuid) -> Result<Owner, AppError> {
        sqlx::query_as::<_, Owner>(&format!(
            "SELECT {} FROM owners WHERE id = $1 AND status <> 'deleted'",
            OWNER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, owner.id = %id, "Database error fetching owner");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Owner not found")))
    }

    #[instrument(skip(db, dto), fields(owner.id = %id, db.table = "owners"))]
    pub async fn update_owner(db: &PgPool, id: Uuid, dto: UpdateOwnerDto) -> Result<Owner, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE owners SET updated_at = now()");

        if let Some(first_name) = dto.first_name {
            qb.push(", first_name = ").push_bind(first_name);
        }
        if let Some(last_name) = dto.last_name {
            qb.push(", last_name = ").push_bind(last_name);
        }
        if let Some(email) = dto.email {
            qb.push(", email = ").push_bind(email.to_lowercase());
        }
        if let Some(contact_number) = dto.contact_number {
            qb.push(", contact_number = ").push_bind(contact_number);
        }
        if let Some(alternative_phone) = dto.alternative_phone {
            qb.push(", alternative_phone = ").push_bind(alternative_phone);
        }
        if let Some(date_of_birth) = dto.date_of_birth {
            qb.push(", date_of_birth = ").push_bind(date_of_birth);
        }
        if let Some(photo) = dto.photo {
            qb.push(", photo = ").push_bind(photo);
        }
        if let Some(status) = dto.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(notes) = dto.notes {
            qb.push(", notes = ").push_bind(notes);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND status <> 'deleted' RETURNING ");
        qb.push(OWNER_COLUMNS);

        let owner = qb
            .build_query_as::<Owner>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, owner.id = %id, "Database error updating owner");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Owner not found")))?;

        info!(owner.id = %id, "Owner updated");
        Ok(owner)
    }

    #[instrument(skip(db), fields(owner.id = %id, db.table = "owners"))]
    pub async fn delete_owner(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE owners SET status = 'deleted', updated_at = now()
             WHERE id = $1 AND status <> 'deleted'",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| {
            error!(error = %e, owner.id = %id, "Database error deleting owner");
            AppError::database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Owner not found")));
        }

        info!(owner.id = %id, "Owner deleted");
        Ok(())
    }
}

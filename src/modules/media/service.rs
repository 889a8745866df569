use std::collections::HashMap;

use futures::future::BoxFuture;
use serde_json::{Value, json};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument};
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::listing::{
    Collection, FieldKind, FilterField, ListResult, Repository, list_documents,
};

use crate::config::storage::StorageConfig;
use crate::utils::signed_url::signed_url;

use super::model::{CreateMediaDto, PropertyMedia, PropertyMediaWithUrl, UpdateMediaDto};

const MEDIA_COLUMNS: &str =
    "id, property_id, media_type, file_key, is_primary, display_order, caption, created_at, updated_at";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("property_id", "property_id", FieldKind::Uuid),
    FilterField::new("media_type", "media_type", FieldKind::Text),
    FilterField::new("is_primary", "is_primary", FieldKind::Bool),
    FilterField::new("display_order", "display_order", FieldKind::Int),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

const MEDIA: Collection = Collection {
    resource: "media",
    select: "SELECT id, property_id, media_type, file_key, is_primary, display_order, caption, \
             created_at, updated_at FROM property_media",
    count_from: "property_media",
    soft_delete: None,
    filterable: FILTERABLE,
    searchable: &["caption"],
};

/// Media repository; the enrichment hook swaps storage keys for signed
/// delivery URLs on every listed row.
pub struct MediaRepo<'a> {
    pub storage: &'a StorageConfig,
}

impl Repository for MediaRepo<'_> {
    fn collection(&self) -> &Collection {
        &MEDIA
    }

    fn enrich<'a>(
        &'a self,
        _db: &'a PgPool,
        mut rows: Vec<Value>,
    ) -> BoxFuture<'a, Result<Vec<Value>, AppError>> {
        Box::pin(async move {
            for row in rows.iter_mut() {
                if let Value::Object(map) = row
                    && let Some(key) = map.get("file_key").and_then(Value::as_str)
                {
                    let url = signed_url(self.storage, key);
                    map.insert("url".to_string(), Value::String(url));
                }
            }
            Ok(rows)
        })
    }
}

/// Signed media payloads for a set of properties, grouped by property id.
/// Used by the property list enrichment hook.
pub async fn media_for_properties(
    db: &PgPool,
    storage: &StorageConfig,
    property_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Value>>, AppError> {
    let rows = sqlx::query_as::<_, PropertyMedia>(&format!(
        "SELECT {} FROM property_media WHERE property_id = ANY($1) ORDER BY property_id, display_order",
        MEDIA_COLUMNS
    ))
    .bind(property_ids)
    .fetch_all(db)
    .await
    .map_err(|e| {
        error!(error = %e, "Database error fetching property media");
        AppError::database(e)
    })?;

    let mut grouped: HashMap<Uuid, Vec<Value>> = HashMap::new();
    for media in rows {
        let url = signed_url(storage, &media.file_key);
        grouped.entry(media.property_id).or_default().push(json!({
            "id": media.id,
            "media_type": media.media_type,
            "url": url,
            "is_primary": media.is_primary,
            "display_order": media.display_order,
            "caption": media.caption,
        }));
    }
    Ok(grouped)
}

pub struct MediaService;

impl MediaService {
    #[instrument(skip(db, dto), fields(db.table = "property_media"))]
    pub async fn create_media(
        db: &PgPool,
        storage: &StorageConfig,
        dto: CreateMediaDto,
    ) -> Result<PropertyMediaWithUrl, AppError> {
        let media = sqlx::query_as::<_, PropertyMedia>(&format!(
            "INSERT INTO property_media (property_id, media_type, file_key, is_primary, display_order, caption) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            MEDIA_COLUMNS
        ))
        .bind(dto.property_id)
        .bind(dto.media_type.as_str())
        .bind(&dto.file_key)
        .bind(dto.is_primary)
        .bind(dto.display_order)
        .bind(&dto.caption)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::not_found(anyhow::anyhow!("Property not found"));
            }
            error!(error = %e, "Database error creating media");
            AppError::database(e)
        })?;

        info!(media.id = %media.id, property.id = %media.property_id, "Media created");
        let url = signed_url(storage, &media.file_key);
        Ok(PropertyMediaWithUrl { media, url })
    }

    #[instrument(skip(db, storage, params), fields(db.table = "property_media"))]
    pub async fn get_media_list(
        db: &PgPool,
        storage: &StorageConfig,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<PropertyMedia, _>(db, &MediaRepo { storage }, params).await
    }

    #[instrument(skip(db, storage), fields(db.table = "property_media"))]
    pub async fn get_media_by_id(
        db: &PgPool,
        storage: &StorageConfig,
        id: Uuid,
    ) -> Result<PropertyMediaWithUrl, AppError> {
        let media = sqlx::query_as::<_, PropertyMedia>(&format!(
            "SELECT {} FROM property_media WHERE id = $1",
            MEDIA_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, media.id = %id, "Database error fetching media");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Media not found")))?;

        let url = signed_url(storage, &media.file_key);
        Ok(PropertyMediaWithUrl { media, url })
    }

    #[instrument(skip(db, dto), fields(media.id = %id, db.table = "property_media"))]
    pub async fn update_media(
        db: &PgPool,
        storage: &StorageConfig,
        id: Uuid,
        dto: UpdateMediaDto,
    ) -> Result<PropertyMediaWithUrl, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE property_media SET updated_at = now()");

        if let Some(is_primary) = dto.is_primary {
            qb.push(", is_primary = ").push_bind(is_primary);
        }
        if let Some(display_order) = dto.display_order {
            qb.push(", display_order = ").push_bind(display_order);
        }
        if let Some(caption) = dto.caption {
            qb.push(", caption = ").push_bind(caption);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ");
        qb.push(MEDIA_COLUMNS);

        let media = qb
            .build_query_as::<PropertyMedia>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, media.id = %id, "Database error updating media");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Media not found")))?;

        info!(media.id = %id, "Media updated");
        let url = signed_url(storage, &media.file_key);
        Ok(PropertyMediaWithUrl { media, url })
    }

    #[instrument(skip(db), fields(media.id = %id, db.table = "property_media"))]
    pub async fn delete_media(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM property_media WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, media.id = %id, "Database error deleting media");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Media not found")));
        }

        info!(media.id = %id, "Media deleted");
        Ok(())
    }
}

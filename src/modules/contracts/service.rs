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
use crate::utils::signed_url::signed_url;

use super::model::{Contract, CreateContractDto, UpdateContractDto};

const CONTRACT_COLUMNS: &str =
    "id, contract_number, property_id, start_date, end_date, contract_type, status, \
     document_key, amount, deposit_amount, currency, notes, created_at, updated_at";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("contract_number", "contract_number", FieldKind::Text),
    FilterField::new("property_id", "property_id", FieldKind::Uuid),
    FilterField::new("contract_type", "contract_type", FieldKind::Text),
    FilterField::new("status", "status", FieldKind::Text),
    FilterField::new("currency", "currency", FieldKind::Text),
    FilterField::new("amount", "amount", FieldKind::Float),
    FilterField::new("start_date", "start_date", FieldKind::Timestamp),
    FilterField::new("end_date", "end_date", FieldKind::Timestamp),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

const CONTRACTS: Collection = Collection {
    resource: "contracts",
    select: "SELECT id, contract_number, property_id, start_date, end_date, contract_type, \
             status, document_key, amount, deposit_amount, currency, notes, created_at, updated_at \
             FROM contracts",
    count_from: "contracts",
    soft_delete: None,
    filterable: FILTERABLE,
    searchable: &["status", "amount", "currency", "contract_number"],
};

/// Contract repository; the enrichment hook signs document URLs on the
/// returned page.
struct ContractRepo<'a> {
    storage: &'a StorageConfig,
}

impl Repository for ContractRepo<'_> {
    fn collection(&self) -> &Collection {
        &CONTRACTS
    }

    fn enrich<'a>(
        &'a self,
        _db: &'a PgPool,
        mut rows: Vec<Value>,
    ) -> BoxFuture<'a, Result<Vec<Value>, AppError>> {
        Box::pin(async move {
            for row in rows.iter_mut() {
                if let Value::Object(map) = row
                    && let Some(key) = map.get("document_key").and_then(Value::as_str)
                {
                    let url = signed_url(self.storage, key);
                    map.insert("document_url".to_string(), Value::String(url));
                }
            }
            Ok(rows)
        })
    }
}

pub struct ContractService;

impl ContractService {
    #[instrument(skip(db, dto), fields(contract.number = %dto.contract_number, db.table = "contracts"))]
    pub async fn create_contract(
        db: &PgPool,
        dto: CreateContractDto,
    ) -> Result<Contract, AppError> {
        if dto.end_date <= dto.start_date {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Contract end date must be after the start date"
            )));
        }

        let contract = sqlx::query_as::<_, Contract>(&format!(
            "INSERT INTO contracts \
             (contract_number, property_id, start_date, end_date, contract_type, status, \
              document_key, amount, deposit_amount, currency, notes) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'owner'), COALESCE($6, 'draft'), \
                     $7, $8, $9, COALESCE($10, 'USD'), $11) \
             RETURNING {}",
            CONTRACT_COLUMNS
        ))
        .bind(&dto.contract_number)
        .bind(dto.property_id)
        .bind(dto.start_date)
        .bind(dto.end_date)
        .bind(dto.contract_type.map(|t| t.as_str()))
        .bind(dto.status.map(|s| s.as_str()))
        .bind(&dto.document_key)
        .bind(dto.amount)
        .bind(dto.deposit_amount)
        .bind(&dto.currency)
        .bind(&dto.notes)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    warn!(contract.number = %dto.contract_number, "Duplicate contract number");
                    return AppError::bad_request(anyhow::anyhow!(
                        "Contract number already exists"
                    ));
                }
                if db_err.is_foreign_key_violation() {
                    return AppError::not_found(anyhow::anyhow!("Property not found"));
                }
            }
            error!(error = %e, "Database error creating contract");
            AppError::database(e)
        })?;

        info!(contract.id = %contract.id, "Contract created");
        Ok(contract)
    }

    #[instrument(skip(db, storage, params), fields(db.table = "contracts"))]
    pub async fn get_contracts(
        db: &PgPool,
        storage: &StorageConfig,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<Contract, _>(db, &ContractRepo { storage }, params).await
    }

    #[instrument(skip(db), fields(contract.id = %id, db.table = "contracts"))]
    pub async fn get_contract_by_id(db: &PgPool, id: Uuid) -> Result<Contract, AppError> {
        sqlx::query_as::<_, Contract>(&format!(
            "SELECT {} FROM contracts WHERE id = $1",
            CONTRACT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, contract.id = %id, "Database error fetching contract");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Contract not found")))
    }

    #[instrument(skip(db, dto), fields(contract.id = %id, db.table = "contracts"))]
    pub async fn update_contract(
        db: &PgPool,
        id: Uuid,
        dto: UpdateContractDto,
    ) -> Result<Contract, AppError> {
        if let (Some(start), Some(end)) = (dto.start_date, dto.end_date)
            && end <= start
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Contract end date must be after the start date"
            )));
        }

        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE contracts SET updated_at = now()");

        if let Some(start_date) = dto.start_date {
            qb.push(", start_date = ").push_bind(start_date);
        }
        if let Some(end_date) = dto.end_date {
            qb.push(", end_date = ").push_bind(end_date);
        }
        if let Some(contract_type) = dto.contract_type {
            qb.push(", contract_type = ").push_bind(contract_type.as_str());
        }
        if let Some(status) = dto.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(document_key) = dto.document_key {
            qb.push(", document_key = ").push_bind(document_key);
        }
        if let Some(amount) = dto.amount {
            qb.push(", amount = ").push_bind(amount);
        }
        if let Some(deposit_amount) = dto.deposit_amount {
            qb.push(", deposit_amount = ").push_bind(deposit_amount);
        }
        if let Some(currency) = dto.currency {
            qb.push(", currency = ").push_bind(currency);
        }
        if let Some(notes) = dto.notes {
            qb.push(", notes = ").push_bind(notes);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ");
        qb.push(CONTRACT_COLUMNS);

        let contract = qb
            .build_query_as::<Contract>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, contract.id = %id, "Database error updating contract");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Contract not found")))?;

        info!(contract.id = %id, "Contract updated");
        Ok(contract)
    }

    #[instrument(skip(db), fields(contract.id = %id, db.table = "contracts"))]
    pub async fn delete_contract(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contracts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, contract.id = %id, "Database error deleting contract");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Contract not found")));
        }

        info!(contract.id = %id, "Contract deleted");
        Ok(())
    }
}

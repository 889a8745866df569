use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument};
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::listing::{
    Collection, FieldKind, FilterField, ListResult, Repository, list_documents,
};

use super::model::{CreatePaymentDto, Payment, UpdatePaymentDto};

const PAYMENT_COLUMNS: &str =
    "id, payment_date, total_amount, paid_amount, unpaid_amount, status, payment_method, \
     property_id, assigned_type, username, user_email, owner_name, user_id, created_at, updated_at";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("status", "status", FieldKind::Text),
    FilterField::new("payment_method", "payment_method", FieldKind::Text),
    FilterField::new("assigned_type", "assigned_type", FieldKind::Text),
    FilterField::new("username", "username", FieldKind::Text),
    FilterField::new("user_email", "user_email", FieldKind::Text),
    FilterField::new("owner_name", "owner_name", FieldKind::Text),
    FilterField::new("property_id", "property_id", FieldKind::Uuid),
    FilterField::new("user_id", "user_id", FieldKind::Uuid),
    FilterField::new("total_amount", "total_amount", FieldKind::Float),
    // Date-range filters (start_date/end_date) land on this field
    FilterField::new("date", "payment_date", FieldKind::Timestamp),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

const PAYMENTS: Collection = Collection {
    resource: "payments",
    select: "SELECT id, payment_date, total_amount, paid_amount, unpaid_amount, status, \
             payment_method, property_id, assigned_type, username, user_email, owner_name, \
             user_id, created_at, updated_at FROM payments",
    count_from: "payments",
    soft_delete: None,
    filterable: FILTERABLE,
    searchable: &["username", "user_email", "owner_name", "status", "payment_method"],
};

struct PaymentRepo;

impl Repository for PaymentRepo {
    fn collection(&self) -> &Collection {
        &PAYMENTS
    }
}

fn has_ownership_identifier(
    username: &Option<String>,
    user_email: &Option<String>,
    owner_name: &Option<String>,
) -> bool {
    [username, user_email, owner_name]
        .iter()
        .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
}

pub struct PaymentService;

impl PaymentService {
    #[instrument(skip(db, dto), fields(db.table = "payments"))]
    pub async fn create_payment(db: &PgPool, dto: CreatePaymentDto) -> Result<Payment, AppError> {
        if !has_ownership_identifier(&dto.username, &dto.user_email, &dto.owner_name) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "At least one of username, user email, or owner name is required"
            )));
        }

        let paid = dto.paid_amount.unwrap_or(0.0);
        let unpaid = (dto.total_amount - paid).max(0.0);

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments \
             (payment_date, total_amount, paid_amount, unpaid_amount, status, payment_method, \
              property_id, assigned_type, username, user_email, owner_name, user_id) \
             VALUES (COALESCE($1, now()), $2, $3, $4, COALESCE($5, 'UNPAID'), $6, $7, \
                     COALESCE($8, 'MANUAL'), $9, $10, $11, $12) \
             RETURNING {}",
            PAYMENT_COLUMNS
        ))
        .bind(dto.payment_date)
        .bind(dto.total_amount)
        .bind(paid)
        .bind(unpaid)
        .bind(dto.status.map(|s| s.as_str()))
        .bind(dto.payment_method.as_str())
        .bind(dto.property_id)
        .bind(dto.assigned_type.map(|t| t.as_str()))
        .bind(dto.username.as_ref().map(|s| s.trim().to_string()))
        .bind(dto.user_email.as_ref().map(|s| s.trim().to_lowercase()))
        .bind(dto.owner_name.as_ref().map(|s| s.trim().to_string()))
        .bind(dto.user_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_foreign_key_violation()
            {
                return AppError::not_found(anyhow::anyhow!("Property or user not found"));
            }
            error!(error = %e, "Database error creating payment");
            AppError::database(e)
        })?;

        info!(payment.id = %payment.id, "Payment created");
        Ok(payment)
    }

    #[instrument(skip(db, params), fields(db.table = "payments"))]
    pub async fn get_payments(
        db: &PgPool,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<Payment, _>(db, &PaymentRepo, params).await
    }

    #[instrument(skip(db), fields(payment.id = %id, db.table = "payments"))]
    pub async fn get_payment_by_id(db: &PgPool, id: Uuid) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(&format!(
            "SELECT {} FROM payments WHERE id = $1",
            PAYMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, payment.id = %id, "Database error fetching payment");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Payment not found")))
    }

    #[instrument(skip(db, dto), fields(payment.id = %id, db.table = "payments"))]
    pub async fn update_payment(
        db: &PgPool,
        id: Uuid,
        dto: UpdatePaymentDto,
    ) -> Result<Payment, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE payments SET updated_at = now()");

        if let Some(payment_date) = dto.payment_date {
            qb.push(", payment_date = ").push_bind(payment_date);
        }
        if let Some(total_amount) = dto.total_amount {
            qb.push(", total_amount = ").push_bind(total_amount);
        }
        if let Some(paid_amount) = dto.paid_amount {
            qb.push(", paid_amount = ").push_bind(paid_amount);
        }
        if let Some(status) = dto.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(payment_method) = dto.payment_method {
            qb.push(", payment_method = ").push_bind(payment_method.as_str());
        }
        if let Some(property_id) = dto.property_id {
            qb.push(", property_id = ").push_bind(property_id);
        }
        if let Some(assigned_type) = dto.assigned_type {
            qb.push(", assigned_type = ").push_bind(assigned_type.as_str());
        }
        if let Some(username) = dto.username {
            qb.push(", username = ").push_bind(username);
        }
        if let Some(user_email) = dto.user_email {
            qb.push(", user_email = ").push_bind(user_email.to_lowercase());
        }
        if let Some(owner_name) = dto.owner_name {
            qb.push(", owner_name = ").push_bind(owner_name);
        }
        if let Some(user_id) = dto.user_id {
            qb.push(", user_id = ").push_bind(user_id);
        }

        // Keep the unpaid remainder consistent with the amounts
        qb.push(", unpaid_amount = GREATEST(");
        qb.push("COALESCE(");
        if let Some(total_amount) = dto.total_amount {
            qb.push_bind(total_amount);
        } else {
            qb.push("total_amount");
        }
        qb.push(", 0) - COALESCE(");
        if let Some(paid_amount) = dto.paid_amount {
            qb.push_bind(paid_amount);
        } else {
            qb.push("paid_amount");
        }
        qb.push(", 0), 0)");

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ");
        qb.push(PAYMENT_COLUMNS);

        let payment = qb
            .build_query_as::<Payment>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, payment.id = %id, "Database error updating payment");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Payment not found")))?;

        info!(payment.id = %id, "Payment updated");
        Ok(payment)
    }

    #[instrument(skip(db), fields(payment.id = %id, db.table = "payments"))]
    pub async fn delete_payment(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, payment.id = %id, "Database error deleting payment");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Payment not found")));
        }

        info!(payment.id = %id, "Payment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_identifier_rule() {
        assert!(has_ownership_identifier(
            &Some("jdoe".to_string()),
            &None,
            &None
        ));
        assert!(has_ownership_identifier(
            &None,
            &Some("j@d.test".to_string()),
            &None
        ));
        assert!(!has_ownership_identifier(&None, &None, &None));
        assert!(!has_ownership_identifier(
            &Some("  ".to_string()),
            &None,
            &None
        ));
    }
}

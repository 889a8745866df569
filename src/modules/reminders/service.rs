use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use propdesk_core::AppError;
use propdesk_core::listing::{
    Collection, FieldKind, FilterField, ListResult, Repository, list_documents,
};

use crate::utils::email::EmailService;

use super::model::{CreateReminderDto, Reminder, UpdateReminderDto};

const REMINDER_COLUMNS: &str =
    "id, title, description, date, time, category, priority, notes, created_by, \
     notified_at, created_at, updated_at";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("category", "category", FieldKind::Text),
    FilterField::new("priority", "priority", FieldKind::Text),
    FilterField::new("created_by", "created_by", FieldKind::Uuid),
    FilterField::new("date", "date", FieldKind::Timestamp),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

const REMINDERS: Collection = Collection {
    resource: "reminders",
    select: "SELECT id, title, description, date, time, category, priority, notes, created_by, \
             notified_at, created_at, updated_at FROM reminders",
    count_from: "reminders",
    soft_delete: None,
    filterable: FILTERABLE,
    searchable: &["title", "description", "category", "priority", "notes"],
};

struct ReminderRepo;

impl Repository for ReminderRepo {
    fn collection(&self) -> &Collection {
        &REMINDERS
    }
}

pub struct ReminderService;

impl ReminderService {
    #[instrument(skip(db, dto), fields(db.table = "reminders"))]
    pub async fn create_reminder(
        db: &PgPool,
        created_by: Uuid,
        dto: CreateReminderDto,
    ) -> Result<Reminder, AppError> {
        let reminder = sqlx::query_as::<_, Reminder>(&format!(
            "INSERT INTO reminders (title, description, date, time, category, priority, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'medium'), COALESCE($7, ''), $8) \
             RETURNING {}",
            REMINDER_COLUMNS
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.date)
        .bind(&dto.time)
        .bind(dto.category.as_str())
        .bind(dto.priority.map(|p| p.as_str()))
        .bind(&dto.notes)
        .bind(created_by)
        .fetch_one(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error creating reminder");
            AppError::database(e)
        })?;

        info!(reminder.id = %reminder.id, "Reminder created");
        Ok(reminder)
    }

    #[instrument(skip(db, params), fields(db.table = "reminders"))]
    pub async fn get_reminders(
        db: &PgPool,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<Reminder, _>(db, &ReminderRepo, params).await
    }

    #[instrument(skip(db), fields(reminder.id = %id, db.table = "reminders"))]
    pub async fn get_reminder_by_id(db: &PgPool, id: Uuid) -> Result<Reminder, AppError> {
        sqlx::query_as::<_, Reminder>(&format!(
            "SELECT {} FROM reminders WHERE id = $1",
            REMINDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, reminder.id = %id, "Database error fetching reminder");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Reminder not found")))
    }

    #[instrument(skip(db, dto), fields(reminder.id = %id, db.table = "reminders"))]
    pub async fn update_reminder(
        db: &PgPool,
        id: Uuid,
        dto: UpdateReminderDto,
    ) -> Result<Reminder, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE reminders SET updated_at = now()");

        if let Some(title) = dto.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = dto.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(date) = dto.date {
            // A rescheduled reminder becomes due again
            qb.push(", date = ").push_bind(date);
            qb.push(", notified_at = NULL");
        }
        if let Some(time) = dto.time {
            qb.push(", time = ").push_bind(time);
        }
        if let Some(category) = dto.category {
            qb.push(", category = ").push_bind(category.as_str());
        }
        if let Some(priority) = dto.priority {
            qb.push(", priority = ").push_bind(priority.as_str());
        }
        if let Some(notes) = dto.notes {
            qb.push(", notes = ").push_bind(notes);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" RETURNING ");
        qb.push(REMINDER_COLUMNS);

        let reminder = qb
            .build_query_as::<Reminder>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                error!(error = %e, reminder.id = %id, "Database error updating reminder");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Reminder not found")))?;

        info!(reminder.id = %id, "Reminder updated");
        Ok(reminder)
    }

    #[instrument(skip(db), fields(reminder.id = %id, db.table = "reminders"))]
    pub async fn delete_reminder(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reminders WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, reminder.id = %id, "Database error deleting reminder");
                AppError::database(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Reminder not found")));
        }

        info!(reminder.id = %id, "Reminder deleted");
        Ok(())
    }

    /// Email creators of reminders whose date has arrived and that have not
    /// been notified yet, then mark them notified. Returns how many
    /// notifications went out.
    #[instrument(skip(db, email_service))]
    pub async fn notify_due_reminders(
        db: &PgPool,
        email_service: &EmailService,
    ) -> Result<u64, AppError> {
        let due: Vec<(Uuid, String, String, String, String, String)> = sqlx::query_as(
            "SELECT r.id, r.title, r.date::text, r.time, u.email, u.first_name
             FROM reminders r
             JOIN users u ON u.id = r.created_by
             WHERE r.date <= now() AND r.notified_at IS NULL AND u.status = 'active'
             ORDER BY r.date",
        )
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching due reminders");
            AppError::database(e)
        })?;

        let mut notified = 0;
        for (id, title, date, time, email, first_name) in due {
            if let Err(e) = email_service
                .send_reminder_due_email(&email, &first_name, &title, &date, &time)
                .await
            {
                warn!(error = %e.error, reminder.id = %id, "Failed to send reminder email");
                continue;
            }

            sqlx::query("UPDATE reminders SET notified_at = now() WHERE id = $1")
                .bind(id)
                .execute(db)
                .await
                .map_err(|e| {
                    error!(error = %e, reminder.id = %id, "Database error marking reminder notified");
                    AppError::database(e)
                })?;
            notified += 1;
        }

        info!(notified, "Due reminders processed");
        Ok(notified)
    }
}

use std::collections::HashMap;

use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use propdesk_core::listing::{Collection, FieldKind, FilterField, ListResult, Repository, list_documents};
use propdesk_core::AppError;
use propdesk_core::permissions::Role;

use crate::utils::password::hash_password;

use super::model::{CreateUserDto, UpdateUserDto, User, UserStatus};

const USER_COLUMNS: &str =
    "id, nickname, first_name, last_name, email, date_of_birth, photo, role, \
     contact_number, alternative_phone, status, deleted_at, banned_at, created_at, updated_at";

const FILTERABLE: &[FilterField] = &[
    FilterField::new("nickname", "nickname", FieldKind::Text),
    FilterField::new("first_name", "first_name", FieldKind::Text),
    FilterField::new("last_name", "last_name", FieldKind::Text),
    FilterField::new("email", "email", FieldKind::Text),
    FilterField::new("role", "role", FieldKind::Text),
    FilterField::new("status", "status", FieldKind::Text),
    FilterField::new("contact_number", "contact_number", FieldKind::Text),
    FilterField::new("date_of_birth", "date_of_birth", FieldKind::Timestamp),
    FilterField::new("created_at", "created_at", FieldKind::Timestamp),
];

const USERS: Collection = Collection {
    resource: "users",
    select: "SELECT id, nickname, first_name, last_name, email, date_of_birth, photo, role, \
             contact_number, alternative_phone, status, deleted_at, banned_at, created_at, updated_at \
             FROM users",
    count_from: "users",
    soft_delete: Some("status <> 'deleted'"),
    filterable: FILTERABLE,
    searchable: &[
        "first_name",
        "last_name",
        "role",
        "email",
        "nickname",
        "status",
        "contact_number",
        "alternative_phone",
        "date_of_birth",
    ],
};

struct UserRepo;

impl Repository for UserRepo {
    fn collection(&self) -> &Collection {
        &USERS
    }
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(user.email = %dto.email, db.table = "users"))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let hashed = hash_password(&dto.password)?;
        let role = dto.role.unwrap_or(Role::Guest);

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users \
             (nickname, first_name, last_name, email, date_of_birth, photo, role, contact_number, alternative_phone, password) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(&dto.nickname)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.email.to_lowercase())
        .bind(dto.date_of_birth)
        .bind(&dto.photo)
        .bind(role.as_str())
        .bind(&dto.contact_number)
        .bind(&dto.alternative_phone)
        .bind(&hashed)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(user.email = %dto.email, "Duplicate email or nickname");
                return AppError::bad_request(anyhow::anyhow!(
                    "A user with this email or nickname already exists"
                ));
            }
            error!(error = %e, "Database error creating user");
            AppError::database(e)
        })?;

        info!(user.id = %user.id, user.email = %user.email, "User created");
        Ok(user)
    }

    #[instrument(skip(db, params), fields(db.table = "users"))]
    pub async fn get_users(
        db: &PgPool,
        params: &HashMap<String, String>,
    ) -> Result<ListResult, AppError> {
        list_documents::<User, _>(db, &UserRepo, params).await
    }

    #[instrument(skip(db), fields(db.table = "users"))]
    pub async fn get_user_by_id(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1 AND status <> 'deleted'",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %id, "Database error fetching user");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))
    }

    #[instrument(skip(db, dto), fields(user.id = %id, db.table = "users"))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE users SET updated_at = now()");

        if let Some(nickname) = dto.nickname {
            qb.push(", nickname = ").push_bind(nickname);
        }
        if let Some(first_name) = dto.first_name {
            qb.push(", first_name = ").push_bind(first_name);
        }
        if let Some(last_name) = dto.last_name {
            qb.push(", last_name = ").push_bind(last_name);
        }
        if let Some(email) = dto.email {
            qb.push(", email = ").push_bind(email.to_lowercase());
        }
        if let Some(date_of_birth) = dto.date_of_birth {
            qb.push(", date_of_birth = ").push_bind(date_of_birth);
        }
        if let Some(photo) = dto.photo {
            qb.push(", photo = ").push_bind(photo);
        }
        if let Some(role) = dto.role {
            qb.push(", role = ").push_bind(role.as_str());
        }
        if let Some(contact_number) = dto.contact_number {
            qb.push(", contact_number = ").push_bind(contact_number);
        }
        if let Some(alternative_phone) = dto.alternative_phone {
            qb.push(", alternative_phone = ").push_bind(alternative_phone);
        }

        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND status <> 'deleted' RETURNING ");
        qb.push(USER_COLUMNS);

        let user = qb
            .build_query_as::<User>()
            .fetch_optional(db)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::bad_request(anyhow::anyhow!(
                        "A user with this email or nickname already exists"
                    ));
                }
                error!(error = %e, user.id = %id, "Database error updating user");
                AppError::database(e)
            })?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        info!(user.id = %id, "User updated");
        Ok(user)
    }

    /// Soft delete: the row stays for audit and joins, but disappears from
    /// every listing and lookup.
    #[instrument(skip(db), fields(user.id = %id, db.table = "users"))]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE users SET status = 'deleted', deleted_at = now(), updated_at = now()
             WHERE id = $1 AND status <> 'deleted'",
        )
        .bind(id)
        .execute(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %id, "Database error deleting user");
            AppError::database(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("User not found")));
        }

        info!(user.id = %id, "User deleted");
        Ok(())
    }

    /// Ban or reactivate a user.
    #[instrument(skip(db), fields(user.id = %id, db.table = "users"))]
    pub async fn set_user_status(
        db: &PgPool,
        id: Uuid,
        status: UserStatus,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET status = $2, \
             banned_at = CASE WHEN $2 = 'banned' THEN now() ELSE NULL END, \
             updated_at = now() \
             WHERE id = $1 AND status <> 'deleted' RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %id, "Database error updating user status");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        info!(user.id = %id, status = %user.status, "User status changed");
        Ok(user)
    }
}

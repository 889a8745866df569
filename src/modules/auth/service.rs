use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use propdesk_auth::create_access_token;
use propdesk_core::AppError;

use crate::config::jwt::JwtConfig;
use crate::modules::users::model::{User, UserCredentials};
use crate::modules::users::service::UserService;
use crate::utils::email::EmailService;
use crate::utils::password::{hash_password, verify_password};

fn hash_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, jwt_config, password))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        email: &str,
        password: &str,
    ) -> Result<(String, User), AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(
            "SELECT id, first_name, email, role, status, password
             FROM users WHERE email = $1 AND status <> 'deleted'",
        )
        .bind(email.to_lowercase())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error during login");
            AppError::database(e)
        })?
        .ok_or_else(|| AppError::unauthorized("Incorrect email or password".to_string()))?;

        if !verify_password(password, &credentials.password)? {
            warn!(user.email = %email, "Failed login attempt");
            return Err(AppError::unauthorized(
                "Incorrect email or password".to_string(),
            ));
        }

        if credentials.status == "banned" {
            return Err(AppError::forbidden(
                "Your account has been suspended".to_string(),
            ));
        }

        let token = create_access_token(
            credentials.id,
            &credentials.email,
            &credentials.role,
            &jwt_config.secret,
            jwt_config.access_token_expiry,
        )?;

        let user = UserService::get_user_by_id(db, credentials.id).await?;

        info!(user.id = %user.id, "User logged in");
        Ok((token, user))
    }

    #[instrument(skip(db))]
    pub async fn me(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        UserService::get_user_by_id(db, user_id).await
    }

    /// Issue a reset token and mail it out. Always answers the same way so
    /// the endpoint cannot be used to probe which emails exist.
    #[instrument(skip(db, email_service))]
    pub async fn forgot_password(
        db: &PgPool,
        email_service: &EmailService,
        email: &str,
    ) -> Result<(), AppError> {
        let user: Option<(Uuid, String)> = sqlx::query_as(
            "SELECT id, first_name FROM users WHERE email = $1 AND status = 'active'",
        )
        .bind(email.to_lowercase())
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error during forgot-password");
            AppError::database(e)
        })?;

        let Some((user_id, first_name)) = user else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = generate_reset_token();

        sqlx::query(
            "UPDATE users SET password_reset_token = $2,
             password_reset_expires = now() + interval '1 hour', updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(hash_reset_token(&token))
        .execute(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %user_id, "Database error storing reset token");
            AppError::database(e)
        })?;

        email_service
            .send_password_reset_email(email, &first_name, &token)
            .await?;

        info!(user.id = %user_id, "Password reset email sent");
        Ok(())
    }

    #[instrument(skip(db, email_service, token, password))]
    pub async fn reset_password(
        db: &PgPool,
        email_service: &EmailService,
        token: &str,
        password: &str,
    ) -> Result<(), AppError> {
        let user: Option<(Uuid, String, String)> = sqlx::query_as(
            "SELECT id, first_name, email FROM users
             WHERE password_reset_token = $1 AND password_reset_expires > now()",
        )
        .bind(hash_reset_token(token))
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error during password reset");
            AppError::database(e)
        })?;

        let Some((user_id, first_name, email)) = user else {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Token is invalid or has expired"
            )));
        };

        let hashed = hash_password(password)?;

        sqlx::query(
            "UPDATE users SET password = $2, password_changed_at = now(),
             password_reset_token = NULL, password_reset_expires = NULL, updated_at = now()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(&hashed)
        .execute(db)
        .await
        .map_err(|e| {
            error!(error = %e, user.id = %user_id, "Database error updating password");
            AppError::database(e)
        })?;

        // Confirmation failures must not roll back the reset itself
        if let Err(e) = email_service
            .send_password_reset_confirmation(&email, &first_name)
            .await
        {
            warn!(error = %e.error, user.id = %user_id, "Failed to send reset confirmation");
        }

        info!(user.id = %user_id, "Password reset completed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_is_random_hex() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_reset_token_hash_is_stable() {
        let token = "fixed-token";
        assert_eq!(hash_reset_token(token), hash_reset_token(token));
        assert_ne!(hash_reset_token(token), hash_reset_token("other-token"));
        assert_eq!(hash_reset_token(token).len(), 64);
    }
}

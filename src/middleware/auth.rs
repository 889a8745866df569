use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use propdesk_auth::{Claims, verify_token};
use propdesk_core::AppError;
use propdesk_core::permissions::Role;

use crate::state::AppState;

/// Cookie carrying the access token for browser clients. API clients may
/// send the same token as a bearer header instead; the header wins when
/// both are present.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Extractor that validates the JWT and provides the authenticated
/// principal's claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Get the user ID as UUID
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    /// Parse the principal's system role
    pub fn role(&self) -> Result<Role, AppError> {
        self.0
            .role
            .parse()
            .map_err(|_| AppError::forbidden("User role not found".to_string()))
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role(), Ok(Role::Admin))
    }

    /// Get the user's email
    pub fn email(&self) -> &str {
        &self.0.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let token = match bearer {
            Some(token) => token,
            None => CookieJar::from_headers(&parts.headers)
                .get(ACCESS_TOKEN_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .ok_or_else(|| {
                    AppError::unauthorized(
                        "You are not logged in. Please log in to get access".to_string(),
                    )
                })?,
        };

        let claims = verify_token(&token, &state.jwt_config.secret)?;

        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@propdesk.test".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(AuthUser(claims("agent")).role().unwrap(), Role::Agent);
        assert!(AuthUser(claims("intruder")).role().is_err());
    }

    #[test]
    fn test_is_admin() {
        assert!(AuthUser(claims("admin")).is_admin());
        assert!(!AuthUser(claims("manager")).is_admin());
    }

    #[test]
    fn test_user_id_round_trip() {
        let id = Uuid::new_v4();
        let mut c = claims("agent");
        c.sub = id.to_string();
        assert_eq!(AuthUser(c).user_id().unwrap(), id);

        let mut bad = claims("agent");
        bad.sub = "not-a-uuid".to_string();
        assert!(AuthUser(bad).user_id().is_err());
    }
}

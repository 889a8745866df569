use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;

use propdesk_core::AppError;

use crate::middleware::auth::{ACCESS_TOKEN_COOKIE, AuthUser};
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::validator::ValidatedJson;

use super::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse, ResetPasswordRequest,
};
use super::service::AuthService;

fn access_cookie(token: String, max_age_seconds: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(ACCESS_TOKEN_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(time::Duration::seconds(max_age_seconds));
    cookie
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; token returned and set as cookie", body = LoginResponse),
        (status = 401, description = "Incorrect email or password"),
        (status = 403, description = "Account suspended")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let (token, user) =
        AuthService::login(&state.db, &state.jwt_config, &dto.email, &dto.password).await?;

    let jar = jar.add(access_cookie(
        token.clone(),
        state.jwt_config.access_token_expiry,
    ));

    Ok((jar, Json(LoginResponse { token, user })))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 200, description = "Logged out; cookie cleared", body = MessageResponse)),
    tag = "Auth"
)]
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar.remove(Cookie::from(ACCESS_TOKEN_COOKIE));

    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "The authenticated user", body = crate::modules::users::model::User),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<crate::modules::users::model::User>, AppError> {
    let user = AuthService::me(&state.db, auth_user.user_id()?).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses((status = 200, description = "Reset email sent if the account exists", body = MessageResponse)),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    AuthService::forgot_password(&state.db, &email_service, &dto.email).await?;

    Ok(Json(MessageResponse {
        message: "If that email exists, a reset link has been sent".to_string(),
    }))
}

#[utoipa::path(
    patch,
    path = "/api/v1/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = MessageResponse),
        (status = 400, description = "Token is invalid or has expired")
    ),
    tag = "Auth"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let email_service = EmailService::new(state.email_config.clone());
    AuthService::reset_password(&state.db, &email_service, &dto.token, &dto.password).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Password has been reset".to_string(),
        }),
    ))
}

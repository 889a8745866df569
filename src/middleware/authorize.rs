//! Capability-based authorization.
//!
//! [`resolve_capabilities`] computes the principal's effective permission
//! map for this request: admin short-circuits to a wildcard, everyone else
//! gets the role defaults with per-user overrides applied (full replacement
//! per resource, never a union). The `require_capability!` macro generates
//! one extractor per (resource, action) pair; controllers take the
//! extractor as a handler argument in place of a bare `AuthUser`.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::error;

use propdesk_auth::Claims;
use propdesk_core::AppError;
use propdesk_core::permissions::{Action, Capabilities, Resource, Role, effective_map};

use crate::middleware::auth::AuthUser;
use crate::modules::role_permissions::service::RolePermissionService;
use crate::modules::user_permissions::service::UserPermissionService;
use crate::state::AppState;

/// Resolve the principal's effective capabilities from the permission
/// stores. Both lookups run concurrently; a store failure surfaces as a
/// generic server error without leaking internals.
pub async fn resolve_capabilities(
    db: &PgPool,
    claims: &Claims,
) -> Result<Capabilities, AppError> {
    let role: Role = claims
        .role
        .parse()
        .map_err(|_| AppError::forbidden("User role not found".to_string()))?;

    // Admin bypasses all permission checks
    if role == Role::Admin {
        return Ok(Capabilities::admin());
    }

    let user_id = uuid::Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))?;

    let (user_map, role_map) = tokio::try_join!(
        UserPermissionService::permission_map(db, user_id),
        RolePermissionService::permission_map(db, role),
    )
    .map_err(|e| {
        error!(error = %e.error, user.id = %user_id, "Permission lookup failed");
        AppError::internal(anyhow::anyhow!("Error checking permissions"))
    })?;

    Ok(Capabilities::resolved(effective_map(&role_map, &user_map)))
}

/// Check one (resource, action) pair for the principal, returning the
/// resolved capabilities on success so they can be attached to the request.
pub async fn authorize(
    db: &PgPool,
    claims: &Claims,
    resource: Resource,
    action: Action,
) -> Result<Capabilities, AppError> {
    let capabilities = resolve_capabilities(db, claims).await?;

    if !capabilities.allows(resource, action) {
        return Err(AppError::forbidden(format!(
            "You do not have permission to {} {}",
            action, resource
        )));
    }

    Ok(capabilities)
}

/// Route-layer middleware restricting a router to admins, used for the
/// permission-management endpoints.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    if !auth_user.is_admin() {
        return AppError::forbidden(
            "Access denied. Administrator privileges required.".to_string(),
        )
        .into_response();
    }

    let req = Request::from_parts(parts, body);
    next.run(req).await
}

/// Generate a typed extractor enforcing one capability. The extractor
/// authenticates, resolves the effective capability set, rejects with 403
/// when the action is not granted, and stashes the resolved
/// [`Capabilities`] in request extensions for downstream use.
#[macro_export]
macro_rules! require_capability {
    ($name:ident, $resource:expr, $action:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = propdesk_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                        $crate::state::AppState,
                    >>::from_request_parts(parts, state)
                    .await?;

                let capabilities = $crate::middleware::authorize::authorize(
                    &state.db,
                    &auth_user.0,
                    $resource,
                    $action,
                )
                .await?;

                parts.extensions.insert(capabilities);

                Ok($name(auth_user))
            }
        }
    };
}

// Pre-defined capability extractors, one per (resource, action).

// Properties
require_capability!(RequirePropertiesRead, Resource::Properties, Action::Read);
require_capability!(RequirePropertiesCreate, Resource::Properties, Action::Create);
require_capability!(RequirePropertiesUpdate, Resource::Properties, Action::Update);
require_capability!(RequirePropertiesDelete, Resource::Properties, Action::Delete);

// Contracts
require_capability!(RequireContractsRead, Resource::Contracts, Action::Read);
require_capability!(RequireContractsCreate, Resource::Contracts, Action::Create);
require_capability!(RequireContractsUpdate, Resource::Contracts, Action::Update);
require_capability!(RequireContractsDelete, Resource::Contracts, Action::Delete);

// Users
require_capability!(RequireUsersRead, Resource::Users, Action::Read);
require_capability!(RequireUsersCreate, Resource::Users, Action::Create);
require_capability!(RequireUsersUpdate, Resource::Users, Action::Update);
require_capability!(RequireUsersDelete, Resource::Users, Action::Delete);

// Payments
require_capability!(RequirePaymentsRead, Resource::Payments, Action::Read);
require_capability!(RequirePaymentsCreate, Resource::Payments, Action::Create);
require_capability!(RequirePaymentsUpdate, Resource::Payments, Action::Update);
require_capability!(RequirePaymentsDelete, Resource::Payments, Action::Delete);

// Features
require_capability!(RequireFeaturesRead, Resource::Features, Action::Read);
require_capability!(RequireFeaturesCreate, Resource::Features, Action::Create);
require_capability!(RequireFeaturesUpdate, Resource::Features, Action::Update);
require_capability!(RequireFeaturesDelete, Resource::Features, Action::Delete);

// Facilities
require_capability!(RequireFacilitiesRead, Resource::Facilities, Action::Read);
require_capability!(RequireFacilitiesCreate, Resource::Facilities, Action::Create);
require_capability!(RequireFacilitiesUpdate, Resource::Facilities, Action::Update);
require_capability!(RequireFacilitiesDelete, Resource::Facilities, Action::Delete);

// Media
require_capability!(RequireMediaRead, Resource::Media, Action::Read);
require_capability!(RequireMediaCreate, Resource::Media, Action::Create);
require_capability!(RequireMediaUpdate, Resource::Media, Action::Update);
require_capability!(RequireMediaDelete, Resource::Media, Action::Delete);

// Reminders
require_capability!(RequireRemindersRead, Resource::Reminders, Action::Read);
require_capability!(RequireRemindersCreate, Resource::Reminders, Action::Create);
require_capability!(RequireRemindersUpdate, Resource::Reminders, Action::Update);
require_capability!(RequireRemindersDelete, Resource::Reminders, Action::Delete);

// Owners
require_capability!(RequireOwnersRead, Resource::Owners, Action::Read);
require_capability!(RequireOwnersCreate, Resource::Owners, Action::Create);
require_capability!(RequireOwnersUpdate, Resource::Owners, Action::Update);
require_capability!(RequireOwnersDelete, Resource::Owners, Action::Delete);

// Clients
require_capability!(RequireClientsRead, Resource::Clients, Action::Read);
require_capability!(RequireClientsCreate, Resource::Clients, Action::Create);
require_capability!(RequireClientsUpdate, Resource::Clients, Action::Update);
require_capability!(RequireClientsDelete, Resource::Clients, Action::Delete);

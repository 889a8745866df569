use axum::http::{HeaderValue, Method};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::middleware::authorize::require_admin;
use crate::modules::auth::router::init_auth_router;
use crate::modules::clients::router::init_clients_router;
use crate::modules::contracts::router::init_contracts_router;
use crate::modules::facilities::router::init_facilities_router;
use crate::modules::features::router::init_features_router;
use crate::modules::media::router::init_media_router;
use crate::modules::owners::router::init_owners_router;
use crate::modules::payments::router::init_payments_router;
use crate::modules::properties::router::init_properties_router;
use crate::modules::reminders::router::init_reminders_router;
use crate::modules::role_permissions::router::init_role_permissions_router;
use crate::modules::user_permissions::router::init_user_permissions_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api/v1",
            Router::new()
                .nest("/auth", init_auth_router())
                .nest("/users", init_users_router())
                .nest("/properties", init_properties_router())
                .nest("/owners", init_owners_router())
                .nest("/clients", init_clients_router())
                .nest("/contracts", init_contracts_router())
                .nest("/payments", init_payments_router())
                .nest("/reminders", init_reminders_router())
                .nest("/media", init_media_router())
                .nest("/features", init_features_router())
                .nest("/facilities", init_facilities_router())
                .nest(
                    "/role-permissions",
                    init_role_permissions_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                )
                .nest(
                    "/user-permissions",
                    init_user_permissions_router()
                        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin)),
                ),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http())
}

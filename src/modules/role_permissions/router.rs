use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::state::AppState;

use super::controller::{
    create_role_permission, delete_role_permission, get_role_permissions,
    get_role_permissions_by_role, update_role_permission,
};

pub fn init_role_permissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_role_permissions).post(create_role_permission))
        .route("/{role}", get(get_role_permissions_by_role))
        .route("/{role}/{resource}", put(update_role_permission))
        .route("/{role}/{resource}", delete(delete_role_permission))
}

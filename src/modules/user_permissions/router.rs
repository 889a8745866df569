use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::state::AppState;

use super::controller::{
    create_user_permission, delete_user_permission, get_user_permissions,
    get_user_permissions_for_user, update_user_permission,
};

pub fn init_user_permissions_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_user_permissions).post(create_user_permission))
        .route("/{identifier}", get(get_user_permissions_for_user))
        .route("/{identifier}/{resource}", put(update_user_permission))
        .route("/{identifier}/{resource}", delete(delete_user_permission))
}

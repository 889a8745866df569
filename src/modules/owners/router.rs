use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_owner, delete_owner, get_owner, get_owners, update_owner};

pub fn init_owners_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_owners).post(create_owner))
        .route(
            "/{id}",
            get(get_owner).patch(update_owner).delete(delete_owner),
        )
}

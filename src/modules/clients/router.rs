use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_client, delete_client, get_client, get_clients, update_client};

pub fn init_clients_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_clients).post(create_client))
        .route(
            "/{id}",
            get(get_client).patch(update_client).delete(delete_client),
        )
}

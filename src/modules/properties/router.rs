use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    create_property, delete_property, get_properties, get_property, set_property_status,
    update_property,
};

pub fn init_properties_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_properties).post(create_property))
        .route(
            "/{id}",
            get(get_property).patch(update_property).delete(delete_property),
        )
        .route("/status/{id}", patch(set_property_status))
}

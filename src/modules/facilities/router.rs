use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_facility, delete_facility, get_facilities, get_facility, get_facility_by_property,
    update_facility,
};

pub fn init_facilities_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_facilities).post(create_facility))
        .route("/property/{property_id}", get(get_facility_by_property))
        .route(
            "/{id}",
            get(get_facility).patch(update_facility).delete(delete_facility),
        )
}

use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_feature, delete_feature, get_feature, get_feature_by_property, get_features,
    update_feature,
};

pub fn init_features_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_features).post(create_feature))
        .route("/property/{property_id}", get(get_feature_by_property))
        .route(
            "/{id}",
            get(get_feature).patch(update_feature).delete(delete_feature),
        )
}

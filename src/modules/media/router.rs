use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{create_media, delete_media, get_media, get_media_list, update_media};

pub fn init_media_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_media_list).post(create_media))
        .route(
            "/{id}",
            get(get_media).patch(update_media).delete(delete_media),
        )
}

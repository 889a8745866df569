use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_payment, delete_payment, get_payment, get_payments, update_payment,
};

pub fn init_payments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_payments).post(create_payment))
        .route(
            "/{id}",
            get(get_payment).patch(update_payment).delete(delete_payment),
        )
}

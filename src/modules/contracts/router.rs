use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{
    create_contract, delete_contract, get_contract, get_contracts, update_contract,
};

pub fn init_contracts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_contracts).post(create_contract))
        .route(
            "/{id}",
            get(get_contract).patch(update_contract).delete(delete_contract),
        )
}

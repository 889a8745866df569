use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_reminder, delete_reminder, get_reminder, get_reminders, notify_due_reminders,
    update_reminder,
};

pub fn init_reminders_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_reminders).post(create_reminder))
        .route("/notify-due", post(notify_due_reminders))
        .route(
            "/{id}",
            get(get_reminder).patch(update_reminder).delete(delete_reminder),
        )
}

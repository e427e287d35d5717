//! Route definitions for the `/communications` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::communications as comms;
use crate::state::AppState;

/// Routes mounted at `/communications`.
///
/// ```text
/// GET, POST          /                        -> list, create (admin)
/// POST               /process-due             -> process_due (admin)
/// GET                /inbox                   -> inbox (auth)
/// GET, PUT, DELETE   /{id}                    -> get, update, delete (admin)
/// POST               /{id}/send               -> send (admin)
/// POST               /{id}/cancel-schedule    -> cancel_schedule (admin)
/// GET                /{id}/view               -> view (auth, recipients only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(comms::list_communications).post(comms::create_communication),
        )
        .route("/process-due", post(comms::process_due))
        .route("/inbox", get(comms::inbox))
        .route(
            "/{id}",
            get(comms::get_communication)
                .put(comms::update_communication)
                .delete(comms::delete_communication),
        )
        .route("/{id}/send", post(comms::send_communication))
        .route("/{id}/cancel-schedule", post(comms::cancel_schedule))
        .route("/{id}/view", get(comms::view_communication))
}

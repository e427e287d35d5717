use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// Routes mounted at `/inventory` (administrators only).
///
/// ```text
/// GET, POST   /                       -> list_items, create_item
/// PUT         /{id}                   -> update_item
/// GET, POST   /movements              -> list_movements, record_movement
/// GET         /alerts                 -> list_alerts
/// POST        /alerts/{id}/process    -> process_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(inventory::list_items).post(inventory::create_item))
        .route("/{id}", put(inventory::update_item))
        .route(
            "/movements",
            get(inventory::list_movements).post(inventory::record_movement),
        )
        .route("/alerts", get(inventory::list_alerts))
        .route("/alerts/{id}/process", post(inventory::process_alert))
}

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// Routes mounted at `/catalog` (public).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/provinces", get(catalog::list_provinces))
        .route("/user-types", get(catalog::list_user_types))
}

//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users` (administrators only).
///
/// ```text
/// GET, POST          /                         -> list_users, create_user
/// GET, PUT, DELETE   /{id}                     -> get_user, update_user, delete_user
/// POST               /{id}/reset-password      -> reset_password
/// POST               /{id}/temporary-password  -> temporary_password
/// POST               /{id}/email               -> send_email
/// GET                /{id}/communications      -> received_communications
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/reset-password", post(users::reset_password))
        .route("/{id}/temporary-password", post(users::temporary_password))
        .route("/{id}/email", post(users::send_email))
        .route("/{id}/communications", get(users::received_communications))
}

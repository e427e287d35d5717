pub mod auth;
pub mod catalog;
pub mod communications;
pub mod health;
pub mod inventory;
pub mod products;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login, /auth/register, /auth/logout          session (public)
/// /auth/me                                           own profile (auth)
/// /auth/forgot-password, /auth/reset-password        password recovery (public)
///
/// /catalog/provinces, /catalog/user-types            lookups (public)
///
/// /users                                             list, create (admin)
/// /users/{id}                                        get, update, delete
/// /users/{id}/reset-password                         set password (POST)
/// /users/{id}/temporary-password                     generate + email (POST)
/// /users/{id}/email                                  ad-hoc email (POST)
/// /users/{id}/communications                         received (GET)
///
/// /communications                                    list, create (admin)
/// /communications/process-due                        manual sweep (POST)
/// /communications/inbox                              caller's inbox (auth)
/// /communications/{id}                               get, update, delete
/// /communications/{id}/send                          manual send (POST)
/// /communications/{id}/cancel-schedule               unschedule (POST)
/// /communications/{id}/view                          recipient view (auth)
///
/// /brands                                            list, create (admin)
/// /products                                          list (auth), create (admin)
/// /products/{id}                                     get, update, deactivate
/// /warehouses                                        list, create (admin)
///
/// /inventory                                         list, create stock rows
/// /inventory/{id}                                    update minimum (PUT)
/// /inventory/movements                               list, record
/// /inventory/alerts                                  list
/// /inventory/alerts/{id}/process                     process (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/catalog", catalog::router())
        .nest("/users", users::router())
        .nest("/communications", communications::router())
        .nest("/brands", products::brands_router())
        .nest("/products", products::products_router())
        .nest("/warehouses", products::warehouses_router())
        .nest("/inventory", inventory::router())
}

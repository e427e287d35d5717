//! Route definitions for brands, products and warehouses.

use axum::routing::get;
use axum::Router;

use crate::handlers::{brands, products, warehouses};
use crate::state::AppState;

/// Routes mounted at `/brands` (administrators only).
pub fn brands_router() -> Router<AppState> {
    Router::new().route("/", get(brands::list_brands).post(brands::create_brand))
}

/// Routes mounted at `/products`.
///
/// ```text
/// GET, POST          /       -> list (auth), create (admin)
/// GET, PUT, DELETE   /{id}   -> get (auth), update (admin), deactivate (admin)
/// ```
pub fn products_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/{id}",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
}

/// Routes mounted at `/warehouses` (administrators only).
pub fn warehouses_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(warehouses::list_warehouses).post(warehouses::create_warehouse),
    )
}

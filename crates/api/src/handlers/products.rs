//! Handlers for the `/products` resource.
//!
//! Products are never hard-deleted; `DELETE` deactivates them so stock and
//! movement history stay intact.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ingetech_core::error::CoreError;
use ingetech_core::types::DbId;
use ingetech_db::models::product::{CreateProduct, Product, UpdateProduct};
use ingetech_db::repositories::ProductRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /products`.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub brand_id: Option<DbId>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Product",
        id,
    })
}

fn validate_price(price_cents: i64) -> AppResult<()> {
    if price_cents < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Price cannot be negative".into(),
        )));
    }
    Ok(())
}

/// GET /api/v1/products?include_inactive=
///
/// Inactive products are only listed for administrators.
pub async fn list_products(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let include_inactive = params.include_inactive && user.is_admin();
    let products = ProductRepo::list(&state.pool, include_inactive).await?;
    Ok(Json(DataResponse { data: products }))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ProductRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|p| p.is_active || user.is_admin())
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: product }))
}

/// POST /api/v1/products
pub async fn create_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    if input.code.trim().is_empty() || input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Product code and name are required".into(),
        )));
    }
    validate_price(input.price_cents)?;

    let create = CreateProduct {
        code: input.code.trim().to_string(),
        name: input.name.trim().to_string(),
        description: input.description,
        price_cents: input.price_cents,
        brand_id: input.brand_id,
        created_by: Some(admin.user_id),
    };
    let product = ProductRepo::create(&state.pool, &create).await?;
    tracing::info!(product_id = product.id, code = %product.code, "Product created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// PUT /api/v1/products/{id}
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProduct>,
) -> AppResult<Json<DataResponse<Product>>> {
    if let Some(price) = input.price_cents {
        validate_price(price)?;
    }
    let product = ProductRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/products/{id}
///
/// Deactivates the product.
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProductRepo::deactivate(&state.pool, id).await? {
        tracing::info!(product_id = id, "Product deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

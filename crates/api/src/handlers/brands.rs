//! Handlers for the `/brands` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ingetech_core::error::CoreError;
use ingetech_db::models::brand::{Brand, CreateBrand};
use ingetech_db::repositories::BrandRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/brands
pub async fn list_brands(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Brand>>>> {
    let brands = BrandRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: brands }))
}

/// POST /api/v1/brands
pub async fn create_brand(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateBrand>,
) -> AppResult<(StatusCode, Json<DataResponse<Brand>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Brand name is required".into(),
        )));
    }
    let brand = BrandRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: brand })))
}

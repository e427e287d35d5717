//! Handlers for the `/warehouses` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ingetech_core::error::CoreError;
use ingetech_db::models::warehouse::{CreateWarehouse, Warehouse};
use ingetech_db::repositories::WarehouseRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/warehouses
pub async fn list_warehouses(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Warehouse>>>> {
    let warehouses = WarehouseRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: warehouses }))
}

/// POST /api/v1/warehouses
pub async fn create_warehouse(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateWarehouse>,
) -> AppResult<(StatusCode, Json<DataResponse<Warehouse>>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Warehouse name is required".into(),
        )));
    }
    let warehouse = WarehouseRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: warehouse })))
}

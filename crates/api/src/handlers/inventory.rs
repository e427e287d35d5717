//! Handlers for the `/inventory` resource: stock rows, movements and
//! low-stock alerts.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ingetech_core::error::CoreError;
use ingetech_core::inventory::MovementKind;
use ingetech_core::types::DbId;
use ingetech_db::models::inventory::{
    CreateInventoryItem, CreateInventoryMovement, InventoryItem, InventoryMovement, StockAlert,
    UpdateInventoryItem,
};
use ingetech_db::repositories::{InventoryRepo, RecordedMovement, StockAlertRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{AlertListParams, InventoryListParams, MovementListParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /inventory/movements`.
#[derive(Debug, Deserialize)]
pub struct MovementRequest {
    pub product_id: DbId,
    pub warehouse_id: DbId,
    pub destination_warehouse_id: Option<DbId>,
    pub kind: MovementKind,
    pub quantity: i32,
    pub note: Option<String>,
}

fn validation(msg: &str) -> AppError {
    AppError::Core(CoreError::Validation(msg.into()))
}

fn validate_minimum(minimum: Option<i32>) -> AppResult<()> {
    match minimum {
        Some(m) if m < 1 => Err(validation("Minimum quantity must be at least 1")),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Stock rows
// ---------------------------------------------------------------------------

/// GET /api/v1/inventory?warehouse_id=
pub async fn list_items(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<InventoryListParams>,
) -> AppResult<Json<DataResponse<Vec<InventoryItem>>>> {
    let items = InventoryRepo::list(&state.pool, params.warehouse_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/inventory
pub async fn create_item(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateInventoryItem>,
) -> AppResult<(StatusCode, Json<DataResponse<InventoryItem>>)> {
    if input.quantity < 0 {
        return Err(validation("Quantity cannot be negative"));
    }
    validate_minimum(input.minimum_quantity)?;

    let item = InventoryRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: item })))
}

/// PUT /api/v1/inventory/{id}
pub async fn update_item(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInventoryItem>,
) -> AppResult<Json<DataResponse<InventoryItem>>> {
    validate_minimum(input.minimum_quantity)?;
    let item = InventoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryItem",
            id,
        }))?;
    Ok(Json(DataResponse { data: item }))
}

// ---------------------------------------------------------------------------
// Movements
// ---------------------------------------------------------------------------

/// POST /api/v1/inventory/movements
///
/// Applies the movement to stock atomically and raises a low-stock alert
/// when the row ends at or below its minimum.
pub async fn record_movement(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<MovementRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RecordedMovement>>)> {
    let create = CreateInventoryMovement {
        product_id: input.product_id,
        warehouse_id: input.warehouse_id,
        destination_warehouse_id: input.destination_warehouse_id,
        kind: input.kind,
        quantity: input.quantity,
        user_id: Some(admin.user_id),
        note: input.note,
    };
    let recorded = InventoryRepo::record_movement(&state.pool, &create).await?;

    tracing::info!(
        movement_id = recorded.movement.id,
        kind = %create.kind,
        quantity = create.quantity,
        stock = recorded.item.quantity,
        "Inventory movement recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: recorded })))
}

/// GET /api/v1/inventory/movements?product_id=
pub async fn list_movements(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<MovementListParams>,
) -> AppResult<Json<DataResponse<Vec<InventoryMovement>>>> {
    let movements = InventoryRepo::list_movements(&state.pool, params.product_id).await?;
    Ok(Json(DataResponse { data: movements }))
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

/// GET /api/v1/inventory/alerts?only_open=
pub async fn list_alerts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<AlertListParams>,
) -> AppResult<Json<DataResponse<Vec<StockAlert>>>> {
    let alerts = StockAlertRepo::list(&state.pool, params.only_open).await?;
    Ok(Json(DataResponse { data: alerts }))
}

/// POST /api/v1/inventory/alerts/{id}/process
pub async fn process_alert(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<StockAlert>>> {
    match StockAlertRepo::mark_processed(&state.pool, id).await? {
        Some(alert) => {
            tracing::info!(alert_id = id, processed_by = admin.user_id, "Stock alert processed");
            Ok(Json(DataResponse { data: alert }))
        }
        None => match StockAlertRepo::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::Core(CoreError::Conflict(
                "This alert has already been processed".into(),
            ))),
            None => Err(AppError::Core(CoreError::NotFound {
                entity: "StockAlert",
                id,
            })),
        },
    }
}

//! Public lookup lists used by registration and filter forms.

use axum::extract::State;
use axum::Json;
use ingetech_db::models::lookup::{Province, UserType};
use ingetech_db::repositories::{ProvinceRepo, UserTypeRepo};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/catalog/provinces
pub async fn list_provinces(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Province>>>> {
    let provinces = ProvinceRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: provinces }))
}

/// GET /api/v1/catalog/user-types
pub async fn list_user_types(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserType>>>> {
    let user_types = UserTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: user_types }))
}

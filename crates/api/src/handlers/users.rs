//! Handlers for the `/users` resource (administrator user management).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use ingetech_core::error::CoreError;
use ingetech_core::phone::is_valid_costa_rica_phone;
use ingetech_core::types::DbId;
use ingetech_core::validation::{blank_to_none, validate_full_name, validate_new_password};
use ingetech_db::models::communication::ReceivedCommunication;
use ingetech_db::models::user::{CreateUser, UpdateUser, User, UserResponse, UserSearch};
use ingetech_db::repositories::{DispatchRepo, PasswordResetRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::auth::password::{generate_temporary_password, hash_password};
use crate::error::{AppError, AppResult};
use crate::mail;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub identification: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub province_id: DbId,
    pub user_type_id: DbId,
}

/// Request body for `POST /users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct SetPasswordRequest {
    pub new_password: String,
    pub confirm_password: String,
}

/// Request body for `POST /users/{id}/email`.
#[derive(Debug, Deserialize)]
pub struct DirectEmailRequest {
    pub subject: String,
    pub message: String,
}

/// Response for `POST /users/{id}/temporary-password`.
#[derive(Debug, Serialize)]
pub struct TemporaryPasswordResponse {
    /// Shown once to the administrator.
    pub temporary_password: String,
    pub email_sent: bool,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Validate the name, email and optional phone of an account.
pub(crate) fn validate_contact_fields(
    full_name: &str,
    email: &str,
    phone: Option<&str>,
) -> AppResult<()> {
    validate_full_name(full_name).map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if !email.trim().validate_email() {
        return Err(AppError::Core(CoreError::Validation(
            "A valid email address is required".into(),
        )));
    }

    if let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) {
        if !is_valid_costa_rica_phone(phone) {
            return Err(AppError::Core(CoreError::Validation(
                "Phone must have 8 digits and start with 2, 6, 7 or 8".into(),
            )));
        }
    }
    Ok(())
}

pub(crate) fn hash_or_internal(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

async fn load_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/users?search=&province_id=&user_type_id=
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserSearch>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::search(&state.pool, &params).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state, id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// POST /api/v1/users
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    validate_contact_fields(&input.full_name, &input.email, input.phone.as_deref())?;
    validate_new_password(&input.password, &input.confirm_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let create = CreateUser {
        identification: input.identification.trim().to_string(),
        username: input.username.trim().to_string(),
        email: input.email.trim().to_string(),
        password_hash: hash_or_internal(&input.password)?,
        full_name: input.full_name.trim().to_string(),
        phone: blank_to_none(input.phone),
        address: blank_to_none(input.address),
        birth_date: input.birth_date,
        province_id: input.province_id,
        user_type_id: input.user_type_id,
    };
    let user = UserRepo::create(&state.pool, &create).await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

/// PUT /api/v1/users/{id}
///
/// `phone`, `address` and `birth_date` are replaced by what is sent (absent
/// clears them); other absent fields keep their value.
pub async fn update_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let existing = load_user(&state, id).await?;
    validate_contact_fields(
        input.full_name.as_deref().unwrap_or(&existing.full_name),
        input.email.as_deref().unwrap_or(&existing.email),
        input.phone.as_deref(),
    )?;

    let update = UpdateUser {
        full_name: input.full_name.map(|n| n.trim().to_string()),
        email: input.email.map(|e| e.trim().to_string()),
        phone: blank_to_none(input.phone),
        address: blank_to_none(input.address),
        ..input
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// DELETE /api/v1/users/{id}
///
/// Administrators cannot delete their own account.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if admin.user_id == id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot delete your own account".into(),
        )));
    }

    let deleted = UserRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User", id }))
    }
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// POST /api/v1/users/{id}/reset-password
pub async fn reset_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_new_password(&input.new_password, &input.confirm_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let user = load_user(&state, id).await?;

    let hash = hash_or_internal(&input.new_password)?;
    UserRepo::update_password(&state.pool, id, &hash).await?;
    PasswordResetRepo::invalidate_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, reset_by = admin.user_id, "Password reset by administrator");
    Ok(Json(MessageResponse::new(format!(
        "Password reset for {}",
        user.full_name
    ))))
}

/// POST /api/v1/users/{id}/temporary-password
///
/// Generate a temporary password, store it, and email it to the user. The
/// password is also returned so the administrator can pass it on when email
/// is unavailable.
pub async fn temporary_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TemporaryPasswordResponse>>> {
    let user = load_user(&state, id).await?;

    let temporary = generate_temporary_password();
    let hash = hash_or_internal(&temporary)?;
    UserRepo::update_password(&state.pool, id, &hash).await?;
    PasswordResetRepo::invalidate_for_user(&state.pool, id).await?;

    let email_sent = match &state.mailer {
        Some(mailer) => match mail::send_temporary_password(mailer, &user, &temporary).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(user_id = id, error = %e, "Failed to email temporary password");
                false
            }
        },
        None => false,
    };

    tracing::info!(
        user_id = id,
        generated_by = admin.user_id,
        email_sent,
        "Temporary password generated"
    );
    Ok(Json(DataResponse {
        data: TemporaryPasswordResponse {
            temporary_password: temporary,
            email_sent,
        },
    }))
}

// ---------------------------------------------------------------------------
// Messaging
// ---------------------------------------------------------------------------

/// POST /api/v1/users/{id}/email
pub async fn send_email(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<DirectEmailRequest>,
) -> AppResult<Json<MessageResponse>> {
    mail::validate_direct_message(&input.subject, &input.message)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let user = load_user(&state, id).await?;

    let mailer = state
        .mailer
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Email delivery is not configured".into()))?;

    if let Err(e) = mail::send_direct_message(mailer, &user, &input.subject, &input.message).await
    {
        tracing::error!(user_id = id, error = %e, "Failed to send direct email");
        return Err(AppError::Unavailable(
            "The email could not be sent. Check the mail server configuration".into(),
        ));
    }

    tracing::info!(user_id = id, sent_by = admin.user_id, "Direct email sent");
    Ok(Json(MessageResponse::new(format!(
        "Email sent to {} ({})",
        user.full_name, user.email
    ))))
}

/// GET /api/v1/users/{id}/communications
pub async fn received_communications(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ReceivedCommunication>>>> {
    load_user(&state, id).await?;
    let received = DispatchRepo::list_for_recipient(&state.pool, id).await?;
    Ok(Json(DataResponse { data: received }))
}

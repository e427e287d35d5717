//! Handlers for the `/auth` resource (session, registration, own profile,
//! password recovery).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderName, StatusCode};
use axum::Json;
use chrono::{Duration, NaiveDate, Utc};
use ingetech_core::error::CoreError;
use ingetech_core::roles::USER_TYPE_CLIENT;
use ingetech_core::types::DbId;
use ingetech_core::validation::{blank_to_none, validate_new_password};
use ingetech_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use ingetech_db::repositories::{PasswordResetRepo, UserRepo, UserTypeRepo};
use serde::{Deserialize, Serialize};

use crate::auth::cookie::{clear_session_cookie, session_cookie};
use crate::auth::jwt::generate_session_token;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::reset::{generate_reset_token, hash_reset_token, RESET_TOKEN_TTL_HOURS};
use crate::error::{AppError, AppResult};
use crate::handlers::users::{hash_or_internal, validate_contact_fields};
use crate::mail;
use crate::middleware::rbac::RequireAuth;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Response to every forgot-password request, whether or not the email exists.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If the email is registered, you will receive a link to reset your password";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Body returned by a successful login. The token itself travels in the cookie.
#[derive(Debug, Serialize)]
pub struct SessionInfo {
    /// Session lifetime in seconds.
    pub expires_in: i64,
    pub role: String,
    pub user: UserResponse,
}

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
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
}

/// Request body for `PUT /auth/me`. Leave `new_password` empty to keep the
/// current one.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub province_id: DbId,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
}

/// Request body for `POST /auth/forgot-password`.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
    pub confirm_password: String,
}

type WithCookie<T> = ([(HeaderName, String); 1], T);

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Authenticate with email + password and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<WithCookie<Json<DataResponse<SessionInfo>>>> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Email and password are required".into(),
        )));
    }

    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid email or password".into()));

    let user = UserRepo::find_by_email(&state.pool, input.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Rejected login: wrong password");
        return Err(invalid());
    }

    UserRepo::record_login(&state.pool, user.id).await?;

    let role = UserTypeRepo::find_by_id(&state.pool, user.user_type_id)
        .await?
        .map(|t| t.name)
        .unwrap_or_default();

    let lifetime = state.config.jwt.session_lifetime_secs(input.remember_me);
    let token =
        generate_session_token(user.id, user.user_type_id, &role, lifetime, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, remember_me = input.remember_me, "User signed in");

    let cookie = session_cookie(&token, lifetime, state.config.cookie_secure);
    Ok((
        [(SET_COOKIE, cookie)],
        Json(DataResponse {
            data: SessionInfo {
                expires_in: lifetime,
                role,
                user: UserResponse::from(user),
            },
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Clear the session cookie. Succeeds whether or not a session exists.
pub async fn logout(State(state): State<AppState>) -> WithCookie<Json<MessageResponse>> {
    (
        [(SET_COOKIE, clear_session_cookie(state.config.cookie_secure))],
        Json(MessageResponse::new("Signed out")),
    )
}

/// POST /api/v1/auth/register
///
/// Self-registration. New accounts always get the customer user type.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
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
        user_type_id: USER_TYPE_CLIENT,
    };

    let user = UserRepo::create(&state.pool, &create).await?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(user),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// GET /api/v1/auth/me
pub async fn me(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UserResponse::from(user),
    }))
}

/// PUT /api/v1/auth/me
///
/// Update the caller's own profile. A password change requires the current
/// password.
pub async fn update_me(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = load_user(&state, auth.user_id).await?;
    validate_contact_fields(&input.full_name, &user.email, input.phone.as_deref())?;

    let new_password = blank_to_none(input.new_password);
    if let Some(new_password) = &new_password {
        let current = input.current_password.unwrap_or_default();
        let matches = verify_password(&current, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !matches {
            return Err(AppError::Core(CoreError::Validation(
                "Current password is incorrect".into(),
            )));
        }
        validate_new_password(new_password, &input.confirm_password.unwrap_or_default())
            .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    }

    let update = UpdateUser {
        full_name: Some(input.full_name.trim().to_string()),
        phone: blank_to_none(input.phone),
        address: blank_to_none(input.address),
        birth_date: input.birth_date,
        province_id: Some(input.province_id),
        ..UpdateUser::default()
    };
    let updated = UserRepo::update(&state.pool, user.id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }))?;

    if let Some(new_password) = new_password {
        let hash = hash_or_internal(&new_password)?;
        UserRepo::update_password(&state.pool, user.id, &hash).await?;
        tracing::info!(user_id = user.id, "User changed own password");
    }

    Ok(Json(DataResponse {
        data: UserResponse::from(updated),
    }))
}

// ---------------------------------------------------------------------------
// Password recovery
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/forgot-password
///
/// Always answers with the same message so the endpoint cannot be used to
/// probe which emails are registered.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let email = input.email.trim();
    if email.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Email is required".into(),
        )));
    }

    if let Some(user) = UserRepo::find_by_email(&state.pool, email).await? {
        let (token, hash) = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        PasswordResetRepo::create(&state.pool, user.id, &hash, expires_at).await?;

        let link = format!(
            "{}/reset-password?token={token}",
            state.config.public_base_url
        );
        match &state.mailer {
            Some(mailer) => {
                if let Err(e) = mail::send_reset_link(mailer, &user, &link).await {
                    tracing::error!(user_id = user.id, error = %e, "Failed to send reset link");
                }
            }
            None => tracing::warn!(user_id = user.id, "SMTP not configured, reset link not sent"),
        }
    }

    Ok(Json(MessageResponse::new(FORGOT_PASSWORD_MESSAGE)))
}

/// POST /api/v1/auth/reset-password
///
/// Consume a reset token and set a new password. Any other outstanding
/// tokens of the user are invalidated.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_new_password(&input.new_password, &input.confirm_password)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let token = PasswordResetRepo::consume(&state.pool, &hash_reset_token(input.token.trim()))
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset link".into()))?;

    let hash = hash_or_internal(&input.new_password)?;
    UserRepo::update_password(&state.pool, token.user_id, &hash).await?;
    PasswordResetRepo::invalidate_for_user(&state.pool, token.user_id).await?;

    tracing::info!(user_id = token.user_id, "Password reset via link");
    Ok(Json(MessageResponse::new("Password updated, you can now sign in")))
}

async fn load_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

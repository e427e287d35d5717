//! Handlers for the `/communications` resource.
//!
//! Administrators author, schedule and send communications; every
//! authenticated user can read the ones delivered to them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use ingetech_core::audience::AudienceFilter;
use ingetech_core::channels::ChannelSelection;
use ingetech_core::communication::{
    is_recently_sent, validate_schedule, CommunicationStatus,
};
use ingetech_core::error::CoreError;
use ingetech_core::types::{DbId, Timestamp};
use ingetech_db::models::communication::{
    Communication, CommunicationSegment, CreateCommunication, ReceivedCommunication,
    UpdateCommunication,
};
use ingetech_db::repositories::{CommunicationRepo, DispatchRepo, SegmentRepo};
use ingetech_dispatch::{DispatchOutcome, SweepSummary};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::query::CommunicationListParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for creating or editing a communication.
///
/// Each selected province and each selected user type becomes one audience
/// segment. With no selection the communication goes to every customer.
#[derive(Debug, Deserialize)]
pub struct CommunicationRequest {
    pub title: String,
    pub body: String,
    pub scheduled_at: Option<Timestamp>,
    /// Dispatch right away instead of waiting for the sweep.
    #[serde(default)]
    pub send_now: bool,
    #[serde(default)]
    pub province_ids: Vec<DbId>,
    #[serde(default)]
    pub user_type_ids: Vec<DbId>,
    /// Channels used when `send_now` is set.
    #[serde(default)]
    pub channels: ChannelSelection,
}

/// A communication with its derived state.
#[derive(Debug, Serialize)]
pub struct CommunicationSummary {
    #[serde(flatten)]
    pub communication: Communication,
    pub status: CommunicationStatus,
    pub recently_sent: bool,
}

impl CommunicationSummary {
    fn new(communication: Communication, now: Timestamp) -> Self {
        Self {
            status: communication.status(now),
            recently_sent: is_recently_sent(communication.sent_at, now),
            communication,
        }
    }
}

/// Full view of one communication.
#[derive(Debug, Serialize)]
pub struct CommunicationDetail {
    #[serde(flatten)]
    pub summary: CommunicationSummary,
    pub segments: Vec<CommunicationSegment>,
    /// Number of recipients it has been delivered to.
    pub dispatch_count: i64,
}

/// Result of a create/update that may also have sent the communication.
#[derive(Debug, Serialize)]
pub struct SavedCommunication {
    #[serde(flatten)]
    pub detail: CommunicationDetail,
    /// Present when the request asked to send immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispatch: Option<DispatchOutcome>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Communication",
        id,
    })
}

fn already_sent() -> AppError {
    AppError::Core(CoreError::Conflict(
        "This communication has already been sent".into(),
    ))
}

fn validate_content(input: &CommunicationRequest) -> AppResult<Option<Timestamp>> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation("Title is required".into())));
    }
    if input.body.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation("Message is required".into())));
    }
    validate_schedule(input.scheduled_at, input.send_now, Utc::now())
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))
}

async fn load(state: &AppState, id: DbId) -> AppResult<Communication> {
    CommunicationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))
}

async fn detail(state: &AppState, communication: Communication) -> AppResult<CommunicationDetail> {
    let segments = SegmentRepo::list_for_communication(&state.pool, communication.id).await?;
    let dispatch_count = DispatchRepo::count_for_communication(&state.pool, communication.id).await?;
    Ok(CommunicationDetail {
        summary: CommunicationSummary::new(communication, Utc::now()),
        segments,
        dispatch_count,
    })
}

/// Replace segments, optionally send, and build the response.
async fn finish_save(
    state: &AppState,
    communication: Communication,
    input: &CommunicationRequest,
) -> AppResult<SavedCommunication> {
    let segments =
        AudienceFilter::segments_from_selection(&input.province_ids, &input.user_type_ids);
    SegmentRepo::replace(&state.pool, communication.id, &segments).await?;

    let mut communication = communication;
    let dispatch = if input.send_now {
        let outcome = state
            .dispatcher
            .dispatch(communication.id, input.channels)
            .await?;
        communication = load(state, communication.id).await?;
        Some(outcome)
    } else {
        None
    };

    Ok(SavedCommunication {
        detail: detail(state, communication).await?,
        dispatch,
    })
}

// ---------------------------------------------------------------------------
// Administrator CRUD
// ---------------------------------------------------------------------------

/// GET /api/v1/communications?status=
pub async fn list_communications(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CommunicationListParams>,
) -> AppResult<Json<DataResponse<Vec<CommunicationSummary>>>> {
    let now = Utc::now();
    let items = CommunicationRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|c| CommunicationSummary::new(c, now))
        .filter(|s| params.status.matches(s.status))
        .collect();
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/communications/{id}
pub async fn get_communication(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CommunicationDetail>>> {
    let communication = load(&state, id).await?;
    Ok(Json(DataResponse {
        data: detail(&state, communication).await?,
    }))
}

/// POST /api/v1/communications
pub async fn create_communication(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CommunicationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SavedCommunication>>)> {
    let scheduled_at = validate_content(&input)?;

    let create = CreateCommunication {
        title: input.title.trim().to_string(),
        body: input.body.clone(),
        scheduled_at,
        created_by: Some(admin.user_id),
    };
    let communication = CommunicationRepo::create(&state.pool, &create).await?;
    tracing::info!(
        communication_id = communication.id,
        created_by = admin.user_id,
        scheduled_at = ?communication.scheduled_at,
        send_now = input.send_now,
        "Communication created"
    );

    let saved = finish_save(&state, communication, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: saved })))
}

/// PUT /api/v1/communications/{id}
///
/// Only unsent communications can be edited. The schedule and audience are
/// replaced by what is submitted.
pub async fn update_communication(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CommunicationRequest>,
) -> AppResult<Json<DataResponse<SavedCommunication>>> {
    let existing = load(&state, id).await?;
    if existing.is_sent() {
        return Err(already_sent());
    }
    let scheduled_at = validate_content(&input)?;

    let update = UpdateCommunication {
        title: Some(input.title.trim().to_string()),
        body: Some(input.body.clone()),
        scheduled_at,
    };
    // A concurrent send may have stamped it since the check above.
    let communication = CommunicationRepo::update_unsent(&state.pool, id, &update)
        .await?
        .ok_or_else(already_sent)?;

    let saved = finish_save(&state, communication, &input).await?;
    Ok(Json(DataResponse { data: saved }))
}

/// DELETE /api/v1/communications/{id}
pub async fn delete_communication(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CommunicationRepo::delete(&state.pool, id).await? {
        tracing::info!(communication_id = id, deleted_by = admin.user_id, "Communication deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

// ---------------------------------------------------------------------------
// Sending
// ---------------------------------------------------------------------------

/// POST /api/v1/communications/{id}/send
///
/// Send now through the selected channels. Without a body, or with fields
/// left out, both channels are used.
pub async fn send_communication(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    body: Option<Json<ChannelSelection>>,
) -> AppResult<Json<DataResponse<DispatchOutcome>>> {
    let channels = body.map(|Json(c)| c).unwrap_or_default();
    if load(&state, id).await?.is_sent() {
        return Err(already_sent());
    }

    tracing::info!(
        communication_id = id,
        sent_by = admin.user_id,
        email = channels.email,
        whatsapp = channels.whatsapp,
        "Manual send requested"
    );
    let outcome = state.dispatcher.dispatch(id, channels).await?;
    if outcome.already_sent {
        return Err(already_sent());
    }
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/communications/{id}/cancel-schedule
pub async fn cancel_schedule(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CommunicationSummary>>> {
    let existing = load(&state, id).await?;
    if existing.is_sent() {
        return Err(already_sent());
    }
    if existing.scheduled_at.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "This communication is not scheduled".into(),
        )));
    }

    if !CommunicationRepo::cancel_schedule(&state.pool, id).await? {
        // Sent by the sweep in the meantime.
        return Err(already_sent());
    }
    tracing::info!(communication_id = id, "Schedule cancelled");

    let communication = load(&state, id).await?;
    Ok(Json(DataResponse {
        data: CommunicationSummary::new(communication, Utc::now()),
    }))
}

/// POST /api/v1/communications/process-due
///
/// Run one sweep now instead of waiting for the background task.
pub async fn process_due(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<SweepSummary>>> {
    let summary = state.dispatcher.process_due().await?;
    tracing::info!(
        requested_by = admin.user_id,
        processed = summary.processed,
        total = summary.total,
        "Manual sweep finished"
    );
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Recipient views
// ---------------------------------------------------------------------------

/// GET /api/v1/communications/inbox
pub async fn inbox(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ReceivedCommunication>>>> {
    let received = DispatchRepo::list_for_recipient(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: received }))
}

/// GET /api/v1/communications/{id}/view
///
/// Administrators may view any communication; other users only those
/// delivered to them. Anything else is reported as not found.
pub async fn view_communication(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CommunicationSummary>>> {
    let communication = load(&state, id).await?;
    if !user.is_admin() && !DispatchRepo::exists(&state.pool, id, user.user_id).await? {
        return Err(not_found(id));
    }
    Ok(Json(DataResponse {
        data: CommunicationSummary::new(communication, Utc::now()),
    }))
}

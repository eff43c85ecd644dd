use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::{AuthUser, caller_of};
use crate::extractors::json::AppJson;
use crate::models::event::{
    CanModifyResponse, CreateEventRequest, DeleteEventResponse, EventIdResponse,
    EventListResponse, EventResponse, LikeResponse, UpdateEventRequest,
};
use crate::models::shared::PageQuery;
use crate::service::event::LikeOutcome;
use crate::state::AppState;

fn event_not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Event {id} not found"))
}

/// 404 if the event is absent, 403 if the caller did not author it.
async fn require_author(state: &AppState, auth_user: &AuthUser, id: i32) -> Result<(), AppError> {
    if state.events.can_modify(&auth_user.caller(), id).await? {
        return Ok(());
    }
    match state.events.get_event(id).await? {
        Some(_) => Err(AppError::PermissionDenied),
        None => Err(event_not_found(id)),
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Events",
    operation_id = "createEvent",
    summary = "Post an event",
    description = "Creates an event owned by the caller. The type is derived from the links: \
        any `picture_links` make an IMAGE event, otherwise a `video_link` makes a VIDEO event, \
        otherwise it is TEXT.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = EventIdResponse),
        (status = 400, description = "Validation error or unknown county (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %auth_user.username))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = state
        .events
        .create_event(&auth_user.caller(), payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(EventIdResponse { id })))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Events",
    operation_id = "getEvent",
    summary = "Get an event",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event", body = EventResponse),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<EventResponse>, AppError> {
    let event = state
        .events
        .get_event(id)
        .await?
        .ok_or_else(|| event_not_found(id))?;
    Ok(Json(EventResponse::from(event)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Events",
    operation_id = "updateEvent",
    summary = "Replace an event's content",
    description = "Overwrites title and content and replaces every attachment. Only the author may edit.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventIdResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %auth_user.username))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<UpdateEventRequest>,
) -> Result<Json<EventIdResponse>, AppError> {
    require_author(&state, &auth_user, id).await?;

    let id = state
        .events
        .update_event(id, payload.into())
        .await?
        .ok_or_else(|| event_not_found(id))?;

    Ok(Json(EventIdResponse { id }))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    operation_id = "deleteEvent",
    summary = "Delete an event",
    description = "Removes the event, its attachments and likes. Uploaded files it referenced \
        are deleted best effort. Only the author may delete.",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = DeleteEventResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the author (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(username = %auth_user.username))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteEventResponse>, AppError> {
    require_author(&state, &auth_user, id).await?;

    let deleted = state.events.delete_event(id).await?;
    if !deleted {
        return Err(event_not_found(id));
    }
    Ok(Json(DeleteEventResponse { deleted }))
}

#[utoipa::path(
    put,
    path = "/{id}/like",
    tag = "Events",
    operation_id = "toggleEventLike",
    summary = "Like or unlike an event",
    description = "Flips the caller's like on the event and returns the new state.",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "New like state", body = LikeResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(username = %auth_user.username))]
pub async fn toggle_like(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<LikeResponse>, AppError> {
    match state.events.toggle_like(&auth_user.caller(), id).await? {
        LikeOutcome::NotFound => Err(event_not_found(id)),
        LikeOutcome::Liked { likes } => Ok(Json(LikeResponse { liked: true, likes })),
        LikeOutcome::Unliked { likes } => Ok(Json(LikeResponse {
            liked: false,
            likes,
        })),
    }
}

#[utoipa::path(
    get,
    path = "/{id}/can-modify",
    tag = "Events",
    operation_id = "canModifyEvent",
    summary = "Whether the caller may edit an event",
    description = "Anonymous callers and missing events yield `false`.",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Edit permission", body = CanModifyResponse),
        (status = 401, description = "Malformed token (TOKEN_INVALID)", body = ErrorBody),
    ),
    security((), ("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn can_modify(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CanModifyResponse>, AppError> {
    let can_modify = state.events.can_modify(&caller_of(&auth_user), id).await?;
    Ok(Json(CanModifyResponse { can_modify }))
}

#[utoipa::path(
    get,
    path = "/{id}/events",
    tag = "Counties",
    operation_id = "listCountyEvents",
    summary = "Events posted in a county",
    description = "Newest first.",
    params(("id" = i32, Path, description = "County ID"), PageQuery),
    responses(
        (status = 200, description = "Events", body = EventListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_county_events(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<EventListResponse>, AppError> {
    let page = state.events.list_by_county(id, query.into()).await?;
    Ok(Json(EventListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/{id}/events",
    tag = "Users",
    operation_id = "listUserEvents",
    summary = "Events posted by a user",
    description = "Newest first.",
    params(("id" = i32, Path, description = "User ID"), PageQuery),
    responses(
        (status = 200, description = "Events", body = EventListResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_user_events(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Json<EventListResponse>, AppError> {
    let page = state.events.list_by_user(id, query.into()).await?;
    Ok(Json(EventListResponse::from(page)))
}

#[utoipa::path(
    get,
    path = "/me/events",
    tag = "Users",
    operation_id = "listMyEvents",
    summary = "Events posted by the caller",
    description = "Newest first.",
    params(PageQuery),
    responses(
        (status = 200, description = "Events", body = EventListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query), fields(username = %auth_user.username))]
pub async fn list_my_events(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<EventListResponse>, AppError> {
    let page = state
        .events
        .list_mine(&auth_user.caller(), query.into())
        .await?;
    Ok(Json(EventListResponse::from(page)))
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::ExprTrait;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{blob, event, event_like, user, user_profile};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::handlers::auth::{find_account, unique_violation};
use crate::models::auth::AccountResponse;
use crate::models::user::{
    ChangePasswordRequest, UpdateAccountRequest, UserResponse, validate_change_password,
    validate_update_account,
};
use crate::state::AppState;
use crate::utils::hash;

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    operation_id = "getUser",
    summary = "Public profile of a user",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/me",
    tag = "Users",
    operation_id = "updateMe",
    summary = "Update the caller's account",
    description = "Only the fields present in the body are changed.",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Email in use (EMAIL_TAKEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_me(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    validate_update_account(&payload)?;

    let existing = find_account(&state.db, auth_user.user_id).await?;
    let mut active: user::ActiveModel = existing.into();

    if let Some(email) = payload.email {
        active.email = Set(email.trim().to_lowercase());
    }
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(first_name.trim().to_string());
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(last_name.trim().to_string());
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&state.db).await.map_err(unique_violation)?;
    Ok(Json(AccountResponse::from(updated)))
}

#[utoipa::path(
    put,
    path = "/me/password",
    tag = "Users",
    operation_id = "changePassword",
    summary = "Change the caller's password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Wrong current password (INVALID_CREDENTIALS)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn change_password(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_change_password(&payload)?;

    let existing = find_account(&state.db, auth_user.user_id).await?;
    let is_valid = hash::verify_password(&payload.current_password, &existing.password)
        .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
    if !is_valid {
        return Err(AppError::InvalidCredentials);
    }

    let new_hash = hash::hash_password(&payload.new_password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let mut active: user::ActiveModel = existing.into();
    active.password = Set(new_hash);
    active.updated_at = Set(chrono::Utc::now());
    active.update(&state.db).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/me",
    tag = "Users",
    operation_id = "deleteMe",
    summary = "Delete the caller's account",
    description = "Removes the account, its profile and every event it posted. \
        Uploaded files those events referenced are deleted best effort.",
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn delete_me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let txn = state.db.begin().await?;

    let account = find_account(&txn, auth_user.user_id).await?;
    let profile_ids: Vec<i32> = user_profile::Entity::find()
        .filter(user_profile::Column::UserId.eq(account.id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();

    // Likes this account gave disappear with its profile; keep the counters in step.
    let liked: Vec<i32> = event_like::Entity::find()
        .filter(event_like::Column::ProfileId.is_in(profile_ids.clone()))
        .all(&txn)
        .await?
        .into_iter()
        .map(|l| l.event_id)
        .collect();
    if !liked.is_empty() {
        event::Entity::update_many()
            .col_expr(
                event::Column::Likes,
                Expr::col(event::Column::Likes).sub(1),
            )
            .filter(event::Column::Id.is_in(liked))
            .filter(event::Column::Likes.gt(0))
            .exec(&txn)
            .await?;
    }

    let filenames: Vec<String> = blob::Entity::find()
        .inner_join(event::Entity)
        .filter(event::Column::ProfileId.is_in(profile_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|b| b.filename)
        .collect();

    // Profile, events, blobs and likes cascade from the user row.
    user::Entity::delete_by_id(account.id).exec(&txn).await?;
    txn.commit().await?;

    state
        .events
        .remove_media(filenames.iter().map(String::as_str))
        .await;

    tracing::info!(user_id = account.id, "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

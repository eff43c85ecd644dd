use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::text::{RecommendRequest, RecommendResponse, validate_recommend_request};
use crate::service::text_gen::TextGenError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/recommend",
    tag = "Text",
    operation_id = "recommendText",
    summary = "Draft a post",
    description = "Asks the configured completion model to finish a post from its title and text. \
        When the reply is unusable both fields are `No value suggested`.",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Suggested post", body = RecommendResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 503, description = "Not configured or upstream failure (SERVICE_UNAVAILABLE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(username = %auth_user.username))]
pub async fn recommend(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    validate_recommend_request(&payload)?;

    let suggestion = state
        .text_gen
        .suggest(&payload.title, &payload.current_text, &payload.urls)
        .await
        .map_err(|e| match e {
            TextGenError::NotConfigured => {
                AppError::Unavailable("Text recommendations are not enabled".into())
            }
            other => {
                tracing::warn!(error = %other, "text generation failed");
                AppError::Unavailable("Text recommendation service is unavailable".into())
            }
        })?;

    Ok(Json(RecommendResponse {
        new_title: suggestion.title,
        new_content: suggestion.content,
    }))
}

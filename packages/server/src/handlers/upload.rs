use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Json, body::Body};
use common::storage::{BoxReader, StorageError};
use sea_orm::*;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{blob, event, user_profile};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::upload::{UploadForm, UploadResponse};
use crate::state::AppState;
use crate::utils::filename::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS, stored_name, upload_extension};

/// Request body cap for upload routes: the file limit plus room for multipart framing.
pub fn upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let limit = max_upload_size.saturating_add(1024 * 1024);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

#[utoipa::path(
    post,
    path = "/images",
    tag = "Uploads",
    operation_id = "uploadImage",
    summary = "Upload an image",
    description = "Accepts jpg, jpeg, png, gif, webp, heic and heif files in the `file` field. \
        Reference the returned `filename` from an event's `picture_links`.",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Stored", body = UploadResponse),
        (status = 400, description = "Missing file or unsupported type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(username = %auth_user.username))]
pub async fn upload_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    store_upload(&state, multipart, IMAGE_EXTENSIONS).await
}

#[utoipa::path(
    post,
    path = "/videos",
    tag = "Uploads",
    operation_id = "uploadVideo",
    summary = "Upload a video",
    description = "Accepts mp4, webm, mov and m4v files in the `file` field. \
        Reference the returned `filename` as an event's `video_link`.",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Stored", body = UploadResponse),
        (status = 400, description = "Missing file or unsupported type (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 413, description = "File too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(username = %auth_user.username))]
pub async fn upload_video(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    store_upload(&state, multipart, VIDEO_EXTENSIONS).await
}

#[utoipa::path(
    get,
    path = "/{filename}",
    tag = "Uploads",
    operation_id = "downloadUpload",
    summary = "Fetch an uploaded file",
    params(("filename" = String, Path, description = "Name returned by an upload")),
    responses(
        (status = 200, description = "File content"),
        (status = 400, description = "Invalid filename (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "No such file (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let size = state.media.size(&filename).await?;
    let reader = state.media.get_stream(&filename).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(&filename).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type.as_ref())
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=86400, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

#[utoipa::path(
    delete,
    path = "/{filename}",
    tag = "Uploads",
    operation_id = "deleteUpload",
    summary = "Delete an uploaded file",
    description = "Files attached to another user's event cannot be deleted. \
        Unattached files and files on the caller's own events can.",
    params(("filename" = String, Path, description = "Name returned by an upload")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Attached to another user's event (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No such file (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(username = %auth_user.username))]
pub async fn delete_upload(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if referenced_by_others(&state, auth_user.user_id, &filename).await? {
        return Err(AppError::PermissionDenied);
    }
    if !state.media.delete(&filename).await? {
        return Err(StorageError::NotFound(filename).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Whether `filename` backs a blob on an event the user did not post.
async fn referenced_by_others(
    state: &AppState,
    user_id: i32,
    filename: &str,
) -> Result<bool, AppError> {
    let own_profiles = user_profile::Entity::find()
        .select_only()
        .column(user_profile::Column::Id)
        .filter(user_profile::Column::UserId.eq(user_id))
        .into_tuple::<i32>()
        .all(&state.db)
        .await?;

    let foreign = blob::Entity::find()
        .inner_join(event::Entity)
        .filter(blob::Column::Filename.eq(filename))
        .filter(event::Column::ProfileId.is_not_in(own_profiles))
        .count(&state.db)
        .await?;
    Ok(foreign > 0)
}

async fn store_upload(
    state: &AppState,
    mut multipart: Multipart,
    allowed: &[&str],
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original = field
            .file_name()
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?
            .to_string();
        let ext =
            upload_extension(&original, allowed).map_err(|e| AppError::Validation(e.message()))?;
        let filename = stored_name(&ext);

        let size = stream_field_to_store(field, state, &filename).await?;
        tracing::info!(%filename, size, "upload stored");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: format!("/api/v1/uploads/{filename}"),
                filename,
                size,
            }),
        ));
    }

    Err(AppError::Validation("Missing 'file' field".into()))
}

/// Stream a multipart field to the media store via a temp file.
async fn stream_field_to_store(
    mut field: axum::extract::multipart::Field<'_>,
    state: &AppState,
    filename: &str,
) -> Result<u64, AppError> {
    let max_size = state.config.storage.max_upload_size;
    let temp_path = std::env::temp_dir().join(format!("countypost-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        let mut total_size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(AppError::PayloadTooLarge { limit: max_size });
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        if total_size == 0 {
            return Err(AppError::Validation("Uploaded file is empty".into()));
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
        drop(temp_file);

        let file = tokio::fs::File::open(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
        let reader: BoxReader = Box::new(file);
        Ok(state.media.put_stream(filename, reader).await?)
    }
    .await;

    // Best effort.
    let _ = tokio::fs::remove_file(&temp_path).await;

    result
}

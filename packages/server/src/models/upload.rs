use serde::Serialize;

/// Stored upload, addressable through `GET /uploads/{filename}`.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Generated name to reference from `picture_links` or `video_link`.
    #[schema(example = "3f2b8c1e-4a51-4c3e-9d4e-7c1a2b3c4d5e.jpg")]
    pub filename: String,
    #[schema(example = "/api/v1/uploads/3f2b8c1e-4a51-4c3e-9d4e-7c1a2b3c4d5e.jpg")]
    pub url: String,
    #[schema(example = 204800)]
    pub size: u64,
}

/// Multipart body for uploads.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: Vec<u8>,
}

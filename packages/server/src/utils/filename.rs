/// Extensions accepted by the image upload endpoint.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "heic", "heif"];

/// Extensions accepted by the video upload endpoint.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v"];

/// Reasons a client-supplied upload filename is rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains null bytes or other control characters.
    ControlCharacter,
    /// Filename has no extension to classify it by.
    MissingExtension,
    /// Extension is not in the allow-list for the endpoint.
    UnsupportedExtension(String),
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> String {
        match self {
            Self::Empty => "Filename cannot be empty".into(),
            Self::ControlCharacter => {
                "Invalid filename: control characters are not allowed".into()
            }
            Self::MissingExtension => "Invalid filename: a file extension is required".into(),
            Self::UnsupportedExtension(ext) => format!("Unsupported file type '.{ext}'"),
        }
    }
}

/// Returns the lowercased extension of an uploaded file if it is in `allowed`.
///
/// Only the final path component of `filename` is considered, since browsers
/// on some platforms send the full client path.
pub fn upload_extension(filename: &str, allowed: &[&str]) -> Result<String, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    if trimmed.chars().any(|c| c.is_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    let base = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);

    let ext = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_ascii_lowercase(),
        _ => return Err(FilenameError::MissingExtension),
    };

    if !allowed.contains(&ext.as_str()) {
        return Err(FilenameError::UnsupportedExtension(ext));
    }

    Ok(ext)
}

/// Name under which an upload is stored: a fresh UUID plus the original extension.
pub fn stored_name(ext: &str) -> String {
    format!("{}.{ext}", uuid::Uuid::new_v4())
}

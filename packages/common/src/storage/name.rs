use super::error::StorageError;

const MAX_NAME_LEN: usize = 255;

/// Check that `name` addresses a single file directly inside the store root.
///
/// Anything that could escape the root (separators, `..`, drive prefixes) or
/// land in the store's hidden scratch area (leading dot) is rejected.
pub fn validate_media_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName("name is empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(StorageError::InvalidName(format!(
            "name exceeds {MAX_NAME_LEN} bytes"
        )));
    }
    if name.starts_with('.') {
        return Err(StorageError::InvalidName(format!(
            "'{name}' must not start with a dot"
        )));
    }
    if name
        .chars()
        .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control())
    {
        return Err(StorageError::InvalidName(format!(
            "'{name}' contains a forbidden character"
        )));
    }
    Ok(())
}

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RecommendRequest {
    #[serde(default)]
    #[schema(example = "Flood")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "Water is rising near the bridge")]
    pub current_text: String,
    /// Links to include as context.
    #[serde(default)]
    pub urls: Vec<String>,
}

pub fn validate_recommend_request(payload: &RecommendRequest) -> Result<(), AppError> {
    if payload.title.trim().is_empty() && payload.current_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Provide a title or some text to complete".into(),
        ));
    }
    if payload.title.chars().count() + payload.current_text.chars().count() > 8000 {
        return Err(AppError::Validation(
            "Title and text must be at most 8000 characters combined".into(),
        ));
    }
    if payload.urls.len() > 10 {
        return Err(AppError::Validation("At most 10 urls".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RecommendResponse {
    #[schema(example = "Flash flood near the old bridge")]
    pub new_title: String,
    pub new_content: String,
}

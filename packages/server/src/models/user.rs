use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::auth::{validate_email, validate_name, validate_password};

/// Public view of a user.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    #[schema(example = 42)]
    pub id: i32,
    #[schema(example = "alice_wonder")]
    pub username: String,
    #[schema(example = "Alice")]
    pub first_name: String,
    #[schema(example = "Wonder")]
    pub last_name: String,
}

impl From<crate::entity::user::Model> for UserResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Partial update of the caller's account. Absent fields are left unchanged.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateAccountRequest {
    #[schema(example = "alice@example.org")]
    pub email: Option<String>,
    #[schema(example = "Alice")]
    pub first_name: Option<String>,
    #[schema(example = "Liddell")]
    pub last_name: Option<String>,
}

pub fn validate_update_account(payload: &UpdateAccountRequest) -> Result<(), AppError> {
    if let Some(ref email) = payload.email {
        validate_email(email.trim())?;
    }
    if let Some(ref name) = payload.first_name {
        validate_name(name.trim(), "First name")?;
    }
    if let Some(ref name) = payload.last_name {
        validate_name(name.trim(), "Last name")?;
    }
    Ok(())
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

pub fn validate_change_password(payload: &ChangePasswordRequest) -> Result<(), AppError> {
    if payload.current_password.is_empty() {
        return Err(AppError::Validation(
            "Current password must not be empty".into(),
        ));
    }
    validate_password(&payload.new_password)
}

use sea_orm::DbErr;
use thiserror::Error;

/// Failures raised by the event workflow.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("authentication required")]
    AuthenticationRequired,
    #[error("no profile exists for user '{0}'")]
    ProfileNotFound(String),
    #[error("county id is required")]
    CountyRequired,
    #[error("county {0} does not exist")]
    CountyNotFound(i32),
    #[error("user {0} does not exist")]
    UserNotFound(i32),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

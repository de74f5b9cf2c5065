use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

use crate::validation::FieldErrors;

#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Item not found: {0}")]
    NotFound(Uuid),

    #[error("Item {0} is already claimed")]
    AlreadyClaimed(Uuid),

    #[error("Invalid input: {0}")]
    Validation(FieldErrors),

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ItemResult<T> = Result<T, ItemError>;

/// Convert ItemError to AppError for standardized error responses
impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound(id) => AppError::NotFound(format!("Item {} not found", id)),
            ItemError::AlreadyClaimed(id) => {
                AppError::Conflict(format!("Item {} is already claimed", id))
            }
            ItemError::Validation(fields) => AppError::BadRequest(fields.to_string()),
            ItemError::InvalidImage(msg) => AppError::BadRequest(msg),
            ItemError::Database(msg) => AppError::Database(msg),
            ItemError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ItemError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for ItemError {
    fn from(err: mongodb::error::Error) -> Self {
        ItemError::Database(err.to_string())
    }
}

impl From<FieldErrors> for ItemError {
    fn from(fields: FieldErrors) -> Self {
        ItemError::Validation(fields)
    }
}

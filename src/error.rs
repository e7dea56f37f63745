use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("refusing to share an empty page")]
    EmptyPage,
    #[error("Error, empty message")]
    EmptyHash,
    #[error("No such hash {0}")]
    NoSuchPage(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::EmptyPage | AppError::EmptyHash => StatusCode::BAD_REQUEST,
            AppError::NoSuchPage(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Plain text; the echoed hash is escaped before it gets here.
        (status, self.to_string()).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::catalog::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Торт не найден")]
    NotFound,

    #[error("Сообщение пустое")]
    EmptyMessage,

    #[error("Некорректные данные торта")]
    InvalidCake,

    #[error("internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            StoreError::Database(e) => AppError::Internal(Box::new(e)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::EmptyMessage | AppError::InvalidCake => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Internal(e) => {
                // details stay in the log, the client gets a generic message
                error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Внутренняя ошибка сервера".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Order not found")]
    NotFound,

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => AppError::NotFound,
            StoreError::Unavailable(msg) => AppError::Unavailable(msg),
            StoreError::Conflict(msg) | StoreError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Unavailable(_) => {
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "Order store is unavailable"
                }))
            }
            AppError::Internal(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            })),
        }
    }
}

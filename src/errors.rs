use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use thiserror::Error;

use crate::models::dto::response::ApiResponse;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} with id '{}' not found", entity, id))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::OperationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        ApiResponse::<()>::error(status, self.to_string()).into_http()
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = err.kind.as_ref() {
            if write_error.code == DUPLICATE_KEY_CODE {
                return AppError::Conflict(write_error.message.clone());
            }
        }
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::OperationFailed(format!("BSON serialization error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_helpers::assert_error_status;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("test".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::OperationFailed("test".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_every_variant_maps_to_error_status() {
        let errors = [
            AppError::NotFound("x".into()),
            AppError::Conflict("x".into()),
            AppError::ValidationError("x".into()),
            AppError::DatabaseError("x".into()),
            AppError::OperationFailed("x".into()),
        ];
        for err in errors {
            assert_error_status(err.status_code());
        }
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::not_found("Quiz", "abc");
        assert_eq!(err.to_string(), "Not found: Quiz with id 'abc' not found");
    }

    #[actix_web::test]
    async fn test_error_response_uses_envelope() {
        let response = AppError::Conflict("duplicate answer".into()).error_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 409);
        assert!(json["payload"].is_null());
        assert_eq!(json["message"], "Conflict: duplicate answer");
        assert!(json["timestamp"].is_string());
    }
}

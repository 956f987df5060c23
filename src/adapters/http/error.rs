use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::any::Any;

use crate::application::dto::ErrorResponse;
use crate::domain::errors::DomainError;

/// Error de dominio listo para convertirse en respuesta HTTP.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    /// El límite de transporte solo se alcanza si el fichero ya supera `limit_bytes`.
    pub fn from_multipart(e: MultipartError, limit_bytes: usize) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self(DomainError::FileTooLarge { limit_bytes });
        }
        Self(DomainError::InvalidRequest(e.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        Self(DomainError::InvalidRequest(e.body_text()))
    }
}

fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::InvalidFileType { .. }
        | DomainError::InvalidContentType
        | DomainError::FileTooLarge { .. }
        | DomainError::CorruptedImage(_) => StatusCode::BAD_REQUEST,
        DomainError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Inference(_) | DomainError::Load(_) | DomainError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(&err);

        let message = match &err {
            DomainError::CorruptedImage(detail) => {
                tracing::error!(detail = %detail, "Imagen inválida");
                err.to_string()
            }
            DomainError::Inference(detail) => {
                tracing::error!(detail = %detail, "Error de inferencia");
                "Failed to process image".to_string()
            }
            DomainError::Load(_) | DomainError::Internal(_) => {
                tracing::error!(detail = %err, "Error interno");
                "An internal error occurred".to_string()
            }
            _ => err.to_string(),
        };

        error_body(status, err.code(), message)
    }
}

pub fn error_body(status: StatusCode, code: &str, message: String) -> Response {
    let body = ErrorResponse { error: true, code: code.to_string(), message };
    (status, Json(body)).into_response()
}

/// Respuesta para pánicos capturados por `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail = %detail, "Pánico en el manejador");
    error_body(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_SERVER_ERROR",
        "An internal error occurred".to_string(),
    )
}

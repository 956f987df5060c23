use std::path::PathBuf;
use thiserror::Error;

/// Fallos al cargar el artefacto del modelo.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("model path does not exist: {0}")]
    NotFound(PathBuf),
    #[error("model artifact could not be deserialized: {0}")]
    Deserialize(String),
    #[error("no usable serving entry point: {0}")]
    NoEntryPoint(String),
    #[error("model warm-up failed: {0}")]
    Warmup(String),
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Model is not loaded. Please try again later.")]
    ModelNotLoaded,
    #[error("File type '.{extension}' not allowed. Allowed: {allowed:?}")]
    InvalidFileType {
        extension: String,
        allowed: Vec<String>,
    },
    #[error("Uploaded file must be an image")]
    InvalidContentType,
    #[error("File size exceeds maximum of {}MB", .limit_bytes / (1024 * 1024))]
    FileTooLarge { limit_bytes: usize },
    #[error("Uploaded image is corrupted or invalid")]
    CorruptedImage(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("Failed to process image: {0}")]
    Inference(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Código estable expuesto en el cuerpo JSON de error.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ModelNotLoaded => "MODEL_NOT_LOADED",
            DomainError::InvalidFileType { .. } => "INVALID_FILE_TYPE",
            DomainError::InvalidContentType => "INVALID_CONTENT_TYPE",
            DomainError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            DomainError::CorruptedImage(_) => "CORRUPTED_IMAGE",
            DomainError::InvalidRequest(_) => "INVALID_REQUEST",
            DomainError::Inference(_) => "INFERENCE_ERROR",
            DomainError::Load(_) | DomainError::Internal(_) => "INTERNAL_SERVER_ERROR",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_too_large_message_uses_whole_megabytes() {
        let err = DomainError::FileTooLarge { limit_bytes: 10 * 1024 * 1024 };
        assert_eq!(err.to_string(), "File size exceeds maximum of 10MB");
        assert_eq!(err.code(), "FILE_TOO_LARGE");
    }

    #[test]
    fn load_errors_surface_as_internal() {
        let err: DomainError = LoadError::NoEntryPoint("no outputs".into()).into();
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
    }
}

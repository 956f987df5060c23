use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult};

/// Metadatos declarados por el cliente para el fichero subido.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadMeta {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
}

/// Reglas de aceptación de subidas. Ambas comprobaciones son orientativas:
/// el contenido real solo se valida al decodificar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPolicy {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

impl UploadPolicy {
    pub fn validate_meta(&self, meta: &UploadMeta) -> DomainResult<()> {
        if let Some(name) = meta.file_name.as_deref().filter(|n| !n.is_empty()) {
            // Sin punto, el nombre entero cuenta como extensión.
            let extension = name.rsplit('.').next().unwrap_or(name).to_lowercase();
            if !self.allowed_extensions.iter().any(|a| *a == extension) {
                return Err(DomainError::InvalidFileType {
                    extension,
                    allowed: self.allowed_extensions.clone(),
                });
            }
        }

        if let Some(ct) = meta.content_type.as_deref() {
            if !ct.starts_with("image/") {
                return Err(DomainError::InvalidContentType);
            }
        }
        Ok(())
    }

    pub fn check_size(&self, len: usize) -> DomainResult<()> {
        if len > self.max_file_size {
            return Err(DomainError::FileTooLarge { limit_bytes: self.max_file_size });
        }
        Ok(())
    }
}

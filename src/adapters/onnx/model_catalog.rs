use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::ports::ModelCatalogPort;
use crate::domain::errors::{DomainError, DomainResult, LoadError};
use crate::domain::model::ModelSource;

/// Nombre preferido dentro de un directorio de modelo.
const DEFAULT_ARTIFACT: &str = "model.onnx";

pub struct OnnxModelCatalog;

impl OnnxModelCatalog {
    pub fn new() -> Self { Self }
}

impl Default for OnnxModelCatalog {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl ModelCatalogPort for OnnxModelCatalog {
    async fn resolve_artifact(&self, model: &ModelSource) -> DomainResult<PathBuf> {
        if model.path.as_os_str().is_empty() {
            return Err(LoadError::NotFound(model.path.clone()).into());
        }
        let meta = tokio::fs::metadata(&model.path)
            .await
            .map_err(|_| LoadError::NotFound(model.path.clone()))?;

        if meta.is_file() {
            return Ok(model.path.clone());
        }
        find_in_dir(&model.path).await
    }
}

async fn find_in_dir(dir: &Path) -> DomainResult<PathBuf> {
    let preferred = dir.join(DEFAULT_ARTIFACT);
    if tokio::fs::metadata(&preferred).await.map(|m| m.is_file()).unwrap_or(false) {
        return Ok(preferred);
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| DomainError::from(LoadError::Deserialize(format!("{}: {e}", dir.display()))))?;
    let mut candidates = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("onnx")) && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();

    candidates.into_iter().next().ok_or_else(|| {
        LoadError::Deserialize(format!("no .onnx artifact in {}", dir.display())).into()
    })
}

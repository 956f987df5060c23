use async_trait::async_trait;
use ndarray::Array4;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::{
    classes::ClassRegistry,
    errors::DomainResult,
    model::{EntryPoint, ModelSource},
};

#[async_trait]
pub trait ModelCatalogPort: Send + Sync {
    /// Localiza el artefacto del modelo en disco.
    async fn resolve_artifact(&self, model: &ModelSource) -> DomainResult<PathBuf>;
}

#[async_trait]
pub trait ClassRegistryPort: Send + Sync {
    /// Nunca falla: ante cualquier problema devuelve el registro por defecto.
    async fn load_class_names(&self, path: &Path) -> ClassRegistry;
}

/// Construcción bloqueante de un motor de inferencia.
pub trait ModelLoaderPort: Send + Sync {
    fn load(
        &self,
        artifact: &Path,
        model: &ModelSource,
    ) -> DomainResult<Arc<dyn InferenceEnginePort>>;
}

/// Punto de entrada ya resuelto de un modelo cargado. `run` es bloqueante.
pub trait InferenceEnginePort: Send + Sync {
    fn entry_point(&self) -> &EntryPoint;
    /// Devuelve el vector de salida del primer elemento del batch.
    fn run(&self, input: Array4<f32>) -> DomainResult<Vec<f32>>;
}

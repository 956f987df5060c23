use ndarray::Array4;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info, warn};

use crate::{
    application::{
        ports::{ClassRegistryPort, InferenceEnginePort, ModelCatalogPort, ModelLoaderPort},
        preprocess::{decode_image, preprocess},
    },
    domain::{
        classes::ClassRegistry,
        errors::{DomainError, DomainResult, LoadError},
        model::{ClassifierConfig, EntryPoint},
        prediction::PredictionResult,
        upload::UploadPolicy,
    },
};

/// Modelo cargado junto con su registro de clases. Inmutable tras la carga.
pub struct ModelHandle {
    pub engine: Arc<dyn InferenceEnginePort>,
    pub classes: ClassRegistry,
}

impl ModelHandle {
    pub fn entry_point(&self) -> &EntryPoint {
        self.engine.entry_point()
    }
}

/// Caso de uso de clasificación: carga única del modelo y predicción por petición.
pub struct ClassifierService {
    catalog: Arc<dyn ModelCatalogPort>,
    loader: Arc<dyn ModelLoaderPort>,
    class_names: Arc<dyn ClassRegistryPort>,
    config: ClassifierConfig,
    upload_policy: UploadPolicy,
    handle: RwLock<Option<Arc<ModelHandle>>>,
}

impl ClassifierService {
    pub fn new(
        catalog: Arc<dyn ModelCatalogPort>,
        loader: Arc<dyn ModelLoaderPort>,
        class_names: Arc<dyn ClassRegistryPort>,
        config: ClassifierConfig,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            catalog,
            loader,
            class_names,
            config,
            upload_policy,
            handle: RwLock::new(None),
        }
    }

    pub fn upload_policy(&self) -> &UploadPolicy {
        &self.upload_policy
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Devuelve el modelo cargado o `ModelNotLoaded`.
    pub fn ready_handle(&self) -> DomainResult<Arc<ModelHandle>> {
        self.handle
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(DomainError::ModelNotLoaded)
    }

    /// Carga el modelo y las clases, y hace el warm-up. Una nueva llamada
    /// sustituye el modelo actual; si falla, el servicio queda sin modelo.
    pub async fn load_model(&self) -> DomainResult<()> {
        match self.try_load().await {
            Ok(handle) => {
                *self.handle.write().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                Ok(())
            }
            Err(e) => {
                error!("No se pudo cargar el modelo: {}", e);
                *self.handle.write().unwrap_or_else(PoisonError::into_inner) = None;
                Err(e)
            }
        }
    }

    async fn try_load(&self) -> DomainResult<Arc<ModelHandle>> {
        let artifact = self.catalog.resolve_artifact(&self.config.model).await?;
        info!("Cargando modelo desde {}", artifact.display());

        let loader = self.loader.clone();
        let model = self.config.model.clone();
        let engine = tokio::task::spawn_blocking(move || loader.load(&artifact, &model))
            .await
            .map_err(|e| DomainError::Internal(format!("model load task failed: {e}")))??;

        let ep = engine.entry_point();
        info!("Punto de entrada resuelto: input='{}' output='{}'", ep.input, ep.output);

        let classes = self.class_names.load_class_names(&self.config.class_names_path).await;
        info!("Clases: {:?}", classes.labels());

        self.warm_up(engine.clone()).await?;

        info!("✅ Modelo cargado correctamente");
        Ok(Arc::new(ModelHandle { engine, classes }))
    }

    async fn warm_up(&self, engine: Arc<dyn InferenceEnginePort>) -> DomainResult<()> {
        info!("Calentando el modelo...");
        let shape = self.config.input_shape();
        let outcome = tokio::task::spawn_blocking(move || engine.run(Array4::<f32>::zeros(shape)))
            .await
            .map_err(|e| DomainError::Internal(format!("warm-up task failed: {e}")))
            .and_then(|r| r);

        match outcome {
            Ok(_) => {
                info!("Warm-up completado");
                Ok(())
            }
            Err(e) if self.config.fail_on_warmup_error => {
                Err(LoadError::Warmup(e.to_string()).into())
            }
            Err(e) => {
                warn!("Falló el warm-up del modelo (se sigue sirviendo): {}", e);
                Ok(())
            }
        }
    }

    /// Decodifica, preprocesa e infiere. Bloqueante: llamar desde `spawn_blocking`.
    pub fn classify(&self, handle: &ModelHandle, bytes: &[u8]) -> DomainResult<PredictionResult> {
        let image = decode_image(bytes)?;
        debug!("Imagen decodificada: {}x{} {:?}", image.width(), image.height(), image.color());

        let tensor = preprocess(&image, self.config.image_size);
        let scores = handle.engine.run(tensor)?;

        PredictionResult::from_scores(&scores, &handle.classes)
            .ok_or_else(|| DomainError::Inference("model returned an empty output".into()))
    }
}

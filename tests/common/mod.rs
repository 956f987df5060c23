#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ndarray::Array4;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use beanspect_inference::{
    adapters::http::{router, state::HttpState},
    application::{
        ports::{ClassRegistryPort, InferenceEnginePort, ModelCatalogPort, ModelLoaderPort},
        services::ClassifierService,
    },
    config::Settings,
    domain::{
        classes::ClassRegistry,
        errors::{DomainError, DomainResult, LoadError},
        model::{EntryPoint, ModelSource},
    },
};

pub const BOUNDARY: &str = "beanspect-test-boundary";

pub enum Behavior {
    Scores(Vec<f32>),
    Fail,
    Panic,
    /// Falla solo en la primera llamada (el warm-up).
    FailFirst(Vec<f32>),
}

pub struct FakeEngine {
    entry: EntryPoint,
    behavior: Behavior,
    calls: AtomicUsize,
    pub seen: Mutex<Vec<Array4<f32>>>,
}

impl FakeEngine {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            entry: EntryPoint { input: "input_1".into(), output: "probs".into() },
            behavior,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl InferenceEnginePort for FakeEngine {
    fn entry_point(&self) -> &EntryPoint {
        &self.entry
    }

    fn run(&self, input: Array4<f32>) -> DomainResult<Vec<f32>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(input);
        match &self.behavior {
            Behavior::Scores(s) => Ok(s.clone()),
            Behavior::Fail => Err(DomainError::Inference("runtime exploded".into())),
            Behavior::Panic => panic!("engine panicked"),
            Behavior::FailFirst(_) if n == 0 => {
                Err(DomainError::Inference("cold start failure".into()))
            }
            Behavior::FailFirst(s) => Ok(s.clone()),
        }
    }
}

pub struct FakeLoader {
    pub engine: Arc<FakeEngine>,
}

impl ModelLoaderPort for FakeLoader {
    fn load(
        &self,
        _artifact: &Path,
        _model: &ModelSource,
    ) -> DomainResult<Arc<dyn InferenceEnginePort>> {
        Ok(self.engine.clone())
    }
}

/// Catálogo cuyo resultado se puede cambiar entre cargas.
pub struct FakeCatalog {
    pub available: Mutex<bool>,
}

#[async_trait]
impl ModelCatalogPort for FakeCatalog {
    async fn resolve_artifact(&self, model: &ModelSource) -> DomainResult<PathBuf> {
        if *self.available.lock().unwrap() {
            Ok(model.path.clone())
        } else {
            Err(LoadError::NotFound(model.path.clone()).into())
        }
    }
}

pub struct FixedClasses;

#[async_trait]
impl ClassRegistryPort for FixedClasses {
    async fn load_class_names(&self, _path: &Path) -> ClassRegistry {
        ClassRegistry::fallback()
    }
}

pub struct Harness {
    pub service: Arc<ClassifierService>,
    pub engine: Arc<FakeEngine>,
    pub catalog: Arc<FakeCatalog>,
    pub settings: Arc<Settings>,
}

impl Harness {
    pub fn new(behavior: Behavior) -> Self {
        Self::with_settings(behavior, test_settings())
    }

    pub fn with_settings(behavior: Behavior, settings: Settings) -> Self {
        let engine = FakeEngine::new(behavior);
        let catalog = Arc::new(FakeCatalog { available: Mutex::new(true) });
        let service = Arc::new(ClassifierService::new(
            catalog.clone(),
            Arc::new(FakeLoader { engine: engine.clone() }),
            Arc::new(FixedClasses),
            settings.classifier_config(),
            settings.upload_policy(),
        ));
        Self { service, engine, catalog, settings: Arc::new(settings) }
    }

    pub fn app(&self) -> axum::Router {
        router(HttpState { classifier: self.service.clone(), settings: self.settings.clone() })
    }
}

pub fn test_settings() -> Settings {
    Settings {
        image_size: 8,
        max_file_size: 4096,
        model_path: "/models/fake.onnx".into(),
        ..Settings::default()
    }
}

pub fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| Rgb([x as u8, y as u8, 90])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Cuerpo multipart con un único campo.
pub fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

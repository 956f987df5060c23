use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

use crate::application::ports::ClassRegistryPort;
use crate::domain::classes::ClassRegistry;

/// Formatos aceptados: `["a", "b"]` o `{"class_names": ["a", "b"]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassNamesFile {
    List(Vec<String>),
    Object { class_names: Vec<String> },
}

pub struct JsonClassRegistry;

impl JsonClassRegistry {
    pub fn new() -> Self { Self }
}

impl Default for JsonClassRegistry {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl ClassRegistryPort for JsonClassRegistry {
    async fn load_class_names(&self, path: &Path) -> ClassRegistry {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) => {
                let fallback = ClassRegistry::fallback();
                warn!(
                    "Fichero de clases no disponible ({}: {}), usando valores por defecto: {:?}",
                    path.display(),
                    e,
                    fallback.labels()
                );
                return fallback;
            }
        };

        match parse_class_names(&raw) {
            Some(registry) => {
                if registry.is_empty() {
                    warn!("{} no contiene clases", path.display());
                }
                info!("Cargadas {} clases desde {}", registry.len(), path.display());
                registry
            }
            None => {
                warn!("Formato de {} no reconocido, usando clases por defecto", path.display());
                ClassRegistry::fallback()
            }
        }
    }
}

fn parse_class_names(raw: &str) -> Option<ClassRegistry> {
    match serde_json::from_str::<ClassNamesFile>(raw).ok()? {
        ClassNamesFile::List(labels) | ClassNamesFile::Object { class_names: labels } => {
            Some(ClassRegistry::new(labels))
        }
    }
}

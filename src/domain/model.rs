use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Dónde está el modelo y cómo invocarlo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSource {
    pub path: PathBuf,             // fichero .onnx o directorio que lo contiene
    pub input_name: Option<String>,  // None = primera entrada declarada
    pub output_name: Option<String>, // None = primera salida declarada
    pub intra_threads: usize,
}

/// Entrada/salida resueltas al cargar la sesión.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub input: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub model: ModelSource,
    pub class_names_path: PathBuf,
    pub image_size: u32,
    pub fail_on_warmup_error: bool,
}

impl ClassifierConfig {
    /// Forma NHWC del tensor de entrada.
    pub fn input_shape(&self) -> (usize, usize, usize, usize) {
        let s = self.image_size as usize;
        (1, s, s, 3)
    }
}

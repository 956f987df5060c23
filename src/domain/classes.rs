use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Etiquetas usadas cuando no hay fichero de clases.
pub const DEFAULT_CLASS_NAMES: [&str; 4] = ["arabica", "excelsa", "liberica", "robusta"];

/// Lista ordenada de etiquetas: la posición coincide con la salida del modelo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRegistry {
    labels: Vec<String>,
}

impl ClassRegistry {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn fallback() -> Self {
        Self::new(DEFAULT_CLASS_NAMES.iter().map(|s| s.to_string()).collect())
    }

    /// Etiqueta para una posición de salida; fuera de rango devuelve `class_<i>`.
    pub fn label_for(&self, index: usize) -> Cow<'_, str> {
        match self.labels.get(index) {
            Some(label) => Cow::Borrowed(label.as_str()),
            None => Cow::Owned(format!("class_{index}")),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

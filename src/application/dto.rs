use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::prediction::{ClassPrediction, PredictionResult};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassPredictionDto {
    /// Nombre de la clase
    #[serde(rename = "class")]
    pub class_name: String,
    /// Confianza (0-1)
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    pub predicted_class: String,
    pub confidence: f32,
    /// Todas las clases, ordenadas por confianza descendente.
    pub all_predictions: Vec<ClassPredictionDto>,
}

impl From<ClassPrediction> for ClassPredictionDto {
    fn from(p: ClassPrediction) -> Self {
        Self { class_name: p.label, confidence: p.confidence }
    }
}

impl From<PredictionResult> for PredictionResponse {
    fn from(r: PredictionResult) -> Self {
        Self {
            predicted_class: r.predicted_class,
            confidence: r.confidence,
            all_predictions: r.all_predictions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: bool,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub model_loaded: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    pub service: String,
    pub version: String,
    pub docs: String,
    pub health: String,
}

/// Esquema del formulario multipart de `/predict` (solo documentación).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct PredictUpload {
    /// Imagen (JPG, JPEG, PNG)
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

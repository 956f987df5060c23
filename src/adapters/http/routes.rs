use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use tracing::{info, warn};

use crate::adapters::http::error::{ApiError, ApiResult};
use crate::adapters::http::state::HttpState;
use crate::application::dto::{
    ErrorResponse, HealthResponse, PredictUpload, PredictionResponse, RootResponse,
};
use crate::domain::{errors::DomainError, upload::UploadMeta};

const UPLOAD_FIELD: &str = "file";

#[utoipa::path(
    get,
    path = "/",
    tag = "root",
    responses((status = 200, description = "Información del servicio", body = RootResponse))
)]
pub async fn root(State(st): State<HttpState>) -> Json<RootResponse> {
    Json(RootResponse {
        service: st.settings.app_name.clone(),
        version: st.settings.app_version.clone(),
        docs: "/docs".into(),
        health: "/health".into(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Estado del servicio y del modelo", body = HealthResponse)
    )
)]
#[tracing::instrument(name = "GET /health", skip(st))]
pub async fn health(State(st): State<HttpState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".into(),
        service: st.settings.app_name.clone(),
        version: st.settings.app_version.clone(),
        model_loaded: st.classifier.is_loaded(),
    })
}

#[utoipa::path(
    post,
    path = "/predict",
    tag = "predict",
    request_body(content = PredictUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Clasificación de la imagen", body = PredictionResponse),
        (status = 400, description = "Fichero o imagen inválidos", body = ErrorResponse),
        (status = 422, description = "Falta el campo 'file'", body = ErrorResponse),
        (status = 500, description = "Error de inferencia", body = ErrorResponse),
        (status = 503, description = "Modelo no cargado", body = ErrorResponse)
    )
)]
#[tracing::instrument(name = "POST /predict", skip(st, multipart))]
pub async fn predict(
    State(st): State<HttpState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<PredictionResponse>> {
    // 1. Sin modelo no merece la pena leer la subida
    let handle = st.classifier.ready_handle()?;
    let mut multipart = multipart?;
    let policy = st.classifier.upload_policy().clone();

    // 2. Localizar el campo del fichero
    let field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| ApiError::from_multipart(e, policy.max_file_size))?
        {
            Some(field) if field.name() == Some(UPLOAD_FIELD) => break field,
            Some(_) => continue,
            None => return Err(DomainError::InvalidRequest("No file uploaded".into()).into()),
        }
    };

    // 3. Validación orientativa de nombre y tipo
    let meta = UploadMeta {
        file_name: field.file_name().map(String::from),
        content_type: field.content_type().map(String::from),
    };
    policy.validate_meta(&meta)?;

    // 4. Leer el contenido completo y comprobar el tamaño
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::from_multipart(e, policy.max_file_size))?;
    policy.check_size(bytes.len())?;

    info!("Ejecutando inferencia sobre: {:?} ({} bytes)", meta.file_name, bytes.len());

    // 5. Decodificar, preprocesar e inferir fuera del runtime async
    let classifier = st.classifier.clone();
    let result = tokio::task::spawn_blocking(move || classifier.classify(&handle, &bytes))
        .await
        .map_err(|e| {
            warn!("La tarea de inferencia terminó de forma anómala: {}", e);
            DomainError::Internal(format!("inference task failed: {e}"))
        })??;

    info!("Predicción: {} ({:.2}%)", result.predicted_class, result.confidence * 100.0);
    Ok(Json(result.into()))
}

use utoipa::OpenApi;

use crate::adapters::http::routes;
use crate::application::dto::{
    ClassPredictionDto, ErrorResponse, HealthResponse, PredictUpload, PredictionResponse,
    RootResponse,
};
use crate::config::Settings;

#[derive(OpenApi)]
#[openapi(
    paths(routes::root, routes::health, routes::predict),
    components(schemas(
        ClassPredictionDto,
        PredictionResponse,
        ErrorResponse,
        HealthResponse,
        RootResponse,
        PredictUpload
    )),
    tags(
        (name = "root", description = "Información del servicio"),
        (name = "predict", description = "Clasificación de especies de café"),
        (name = "health", description = "Estado del servicio")
    )
)]
pub struct ApiDoc;

/// Documento OpenAPI con el nombre y la versión configurados.
pub fn api_doc(settings: &Settings) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = settings.app_name.clone();
    doc.info.version = settings.app_version.clone();
    doc
}

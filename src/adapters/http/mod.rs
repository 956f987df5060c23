pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa_swagger_ui::SwaggerUi;

use crate::adapters::http::state::HttpState;

/// Holgura para las cabeceras multipart por encima del tamaño máximo de fichero.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: HttpState) -> Router {
    let body_limit = state.settings.max_file_size.saturating_add(MULTIPART_OVERHEAD);
    let cors = cors_layer(&state.settings.cors_origins);
    // La UI interactiva sirve también el documento en /openapi.json
    let docs = SwaggerUi::new("/docs").url("/openapi.json", openapi::api_doc(&state.settings));

    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/predict", post(routes::predict))
        .merge(docs)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Orígenes explícitos con credenciales; `*` abre a cualquier origen sin credenciales.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Origen CORS ignorado: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(AllowMethods::list([Method::GET, Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

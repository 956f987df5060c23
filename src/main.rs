use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beanspect_inference::{
    adapters::{
        fs::class_names::JsonClassRegistry,
        http::{router, state::HttpState},
        onnx::{classifier_engine::OnnxModelLoader, model_catalog::OnnxModelCatalog},
    },
    application::services::ClassifierService,
    config::Settings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Configuración (.env opcional) y logs (RUST_LOG manda; si no, info o debug)
    dotenv::dotenv().ok();
    let settings = Arc::new(Settings::from_env()?);

    let default_level = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    tracing::info!("☕ Iniciando {}...", settings.app_name);
    tracing::info!("Versión: {}", settings.app_version);
    tracing::info!("Modo debug: {}", settings.debug);

    // 2. Adaptadores de infraestructura y caso de uso
    let classifier = Arc::new(ClassifierService::new(
        Arc::new(OnnxModelCatalog::new()),
        Arc::new(OnnxModelLoader::new()),
        Arc::new(JsonClassRegistry::new()),
        settings.classifier_config(),
        settings.upload_policy(),
    ));

    // 3. Carga única del modelo; si falla, se arranca igualmente sin él
    match classifier.load_model().await {
        Ok(()) => tracing::info!("Modelo cargado durante el arranque"),
        Err(e) => tracing::warn!(
            "No se pudo cargar el modelo ({}): el servicio arranca pero las predicciones fallarán",
            e
        ),
    }

    // 4. Router y servidor
    let state = HttpState { classifier, settings: settings.clone() };
    let app = router(state);

    let addr = settings.bind_addr();
    tracing::info!("🚀 Servidor de inferencia en http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Apagando {}...", settings.app_name);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("No se pudo escuchar Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

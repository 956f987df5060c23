use std::sync::Arc;

use crate::application::services::ClassifierService;
use crate::config::Settings;

/// Estado compartido para los manejadores HTTP de Axum.
/// Contiene el caso de uso de clasificación y la configuración del proceso.
#[derive(Clone)]
pub struct HttpState {
    pub classifier: Arc<ClassifierService>,
    pub settings: Arc<Settings>,
}

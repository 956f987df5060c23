pub mod classifier_engine;
pub mod model_catalog;

//! Servicio de inferencia BeanSpect: clasifica imágenes de granos de café
//! con un modelo ONNX preentrenado y expone el resultado por HTTP.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;

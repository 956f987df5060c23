use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::model::{ClassifierConfig, ModelSource};
use crate::domain::upload::UploadPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Configuración del proceso, leída una sola vez al arrancar.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,

    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,

    pub model_path: PathBuf,
    pub class_names_path: PathBuf,
    pub model_input_name: Option<String>,
    pub model_output_name: Option<String>,
    pub fail_on_warmup_error: bool,
    pub intra_threads: usize,

    pub image_size: u32,
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "BeanSpect AI Inference Service".into(),
            app_version: env!("CARGO_PKG_VERSION").into(),
            debug: false,
            host: "0.0.0.0".into(),
            port: 8000,
            cors_origins: vec![
                "http://localhost:3000".into(),
                "http://localhost:5173".into(),
                "http://localhost:8080".into(),
            ],
            model_path: "/app/models/beanspect_model".into(),
            class_names_path: "/app/models/class_names.json".into(),
            model_input_name: None,
            model_output_name: None,
            fail_on_warmup_error: false,
            intra_threads: 4,
            image_size: 224,
            max_file_size: 10 * 1024 * 1024,
            allowed_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Settings::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Settings {
            app_name: get("APP_NAME").unwrap_or(d.app_name),
            app_version: get("APP_VERSION").unwrap_or(d.app_version),
            debug: parse_bool("DEBUG", get("DEBUG"), d.debug)?,
            host: get("HOST").unwrap_or(d.host),
            port: parse("PORT", get("PORT"), d.port)?,
            cors_origins: get("CORS_ORIGINS").map(|v| parse_list(&v)).unwrap_or(d.cors_origins),
            model_path: get("MODEL_PATH").map(PathBuf::from).unwrap_or(d.model_path),
            class_names_path: get("CLASS_NAMES_PATH")
                .map(PathBuf::from)
                .unwrap_or(d.class_names_path),
            model_input_name: get("MODEL_INPUT_NAME"),
            model_output_name: get("MODEL_OUTPUT_NAME"),
            fail_on_warmup_error: parse_bool(
                "FAIL_ON_WARMUP_ERROR",
                get("FAIL_ON_WARMUP_ERROR"),
                d.fail_on_warmup_error,
            )?,
            intra_threads: parse(
                "MODEL_INTRA_THREADS",
                get("MODEL_INTRA_THREADS"),
                d.intra_threads,
            )?,
            image_size: positive("IMAGE_SIZE", get("IMAGE_SIZE"), d.image_size)?,
            max_file_size: parse("MAX_FILE_SIZE", get("MAX_FILE_SIZE"), d.max_file_size)?,
            allowed_extensions: get("ALLOWED_EXTENSIONS")
                .map(|v| {
                    parse_list(&v)
                        .into_iter()
                        .map(|e| e.trim_start_matches('.').to_lowercase())
                        .collect()
                })
                .unwrap_or(d.allowed_extensions),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn classifier_config(&self) -> ClassifierConfig {
        ClassifierConfig {
            model: ModelSource {
                path: self.model_path.clone(),
                input_name: self.model_input_name.clone(),
                output_name: self.model_output_name.clone(),
                intra_threads: self.intra_threads,
            },
            class_names_path: self.class_names_path.clone(),
            image_size: self.image_size,
            fail_on_warmup_error: self.fail_on_warmup_error,
        }
    }

    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy {
            max_file_size: self.max_file_size,
            allowed_extensions: self.allowed_extensions.clone(),
        }
    }
}

fn parse<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue { key, value: v }),
    }
}

fn positive(key: &'static str, raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    let value = parse(key, raw, default)?;
    if value == 0 {
        return Err(ConfigError::InvalidValue { key, value: "0".into() });
    }
    Ok(value)
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::InvalidValue { key, value: raw.unwrap_or_default() }),
    }
}

/// Acepta `a,b,c` o un array JSON `["a", "b"]`; quita comillas sobrantes.
fn parse_list(raw: &str) -> Vec<String> {
    let items: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str(raw).unwrap_or_else(|_| {
            raw.trim_matches(|c| c == '[' || c == ']').split(',').map(String::from).collect()
        })
    } else {
        raw.split(',').map(String::from).collect()
    };

    items
        .into_iter()
        .map(|s| s.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

use ndarray::{Array4, ArrayViewD, Axis, IxDyn};
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

use crate::application::ports::{InferenceEnginePort, ModelLoaderPort};
use crate::domain::errors::{DomainError, DomainResult, LoadError};
use crate::domain::model::{EntryPoint, ModelSource};

/// Sesión ONNX de un clasificador de imágenes.
pub struct OnnxClassifierEngine {
    // `Session::run` pide `&mut`, así que las inferencias concurrentes se serializan aquí.
    session: Mutex<Session>,
    entry_point: EntryPoint,
}

impl OnnxClassifierEngine {
    pub fn load(path: &Path, model: &ModelSource) -> DomainResult<Self> {
        let deser = |e: ort::Error| DomainError::from(LoadError::Deserialize(e.to_string()));

        let mut builder = Session::builder()
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level3))
            .and_then(|b| b.with_intra_threads(model.intra_threads.max(1)))
            .map_err(deser)?;

        // CUDA es opcional: si está disponible se registra, si no continuamos en CPU.
        let cuda = CUDAExecutionProvider::default().build();
        if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
            builder = builder_with_cuda;
        }

        let session = builder.commit_from_file(path).map_err(deser)?;
        let entry_point = resolve_entry_point(
            session.inputs.iter().map(|i| i.name.as_str()),
            session.outputs.iter().map(|o| o.name.as_str()),
            model,
        )?;

        Ok(Self { session: Mutex::new(session), entry_point })
    }
}

/// Elige la entrada y la salida: las configuradas, o las primeras declaradas por el grafo.
fn resolve_entry_point<'a>(
    inputs: impl Iterator<Item = &'a str>,
    outputs: impl Iterator<Item = &'a str>,
    model: &ModelSource,
) -> DomainResult<EntryPoint> {
    let inputs: Vec<&str> = inputs.collect();
    let outputs: Vec<&str> = outputs.collect();
    debug!("Entradas del modelo: {:?}, salidas: {:?}", inputs, outputs);

    let pick = |declared: &[&str], wanted: Option<&String>, kind: &str| {
        let found: DomainResult<String> = match wanted {
            Some(name) if declared.contains(&name.as_str()) => Ok(name.clone()),
            Some(name) => Err(LoadError::NoEntryPoint(format!(
                "{kind} '{name}' not found, model declares {declared:?}"
            ))
            .into()),
            None => declared.first().map(|s| s.to_string()).ok_or_else(|| {
                LoadError::NoEntryPoint(format!("model declares no {kind}s")).into()
            }),
        };
        found
    };

    Ok(EntryPoint {
        input: pick(&inputs, model.input_name.as_ref(), "input")?,
        output: pick(&outputs, model.output_name.as_ref(), "output")?,
    })
}

impl InferenceEnginePort for OnnxClassifierEngine {
    fn entry_point(&self) -> &EntryPoint {
        &self.entry_point
    }

    fn run(&self, input: Array4<f32>) -> DomainResult<Vec<f32>> {
        let infer_err = |e: ort::Error| DomainError::Inference(e.to_string());

        let shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let (data, _) = input.into_raw_vec_and_offset();
        let tensor = Tensor::from_array((shape, data)).map_err(infer_err)?;

        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        let outputs = session
            .run(ort::inputs![self.entry_point.input.clone() => tensor])
            .map_err(infer_err)?;

        let output = self.entry_point.output.as_str();
        let value = outputs.get(output).ok_or_else(|| {
            DomainError::Inference(format!("output '{output}' missing from results"))
        })?;
        let (shape_out, data_out) = value.try_extract_tensor::<f32>().map_err(infer_err)?;

        let dims: Vec<usize> = shape_out.iter().map(|&x| x.max(0) as usize).collect();
        first_batch_row(&dims, data_out)
    }
}

/// Puntuaciones de la primera imagen del lote; las salidas de rango < 2 se devuelven enteras.
fn first_batch_row(dims: &[usize], data: &[f32]) -> DomainResult<Vec<f32>> {
    if dims.len() < 2 {
        return Ok(data.to_vec());
    }
    if dims[0] == 0 {
        return Err(DomainError::Inference("model returned an empty batch".into()));
    }
    let array_view = ArrayViewD::from_shape(IxDyn(dims), data)
        .map_err(|e| DomainError::Inference(e.to_string()))?;
    Ok(array_view.index_axis(Axis(0), 0).iter().copied().collect())
}

/// Adaptador del puerto de carga sobre ONNX Runtime.
pub struct OnnxModelLoader;

impl OnnxModelLoader {
    pub fn new() -> Self { Self }
}

impl Default for OnnxModelLoader {
    fn default() -> Self { Self::new() }
}

impl ModelLoaderPort for OnnxModelLoader {
    fn load(
        &self,
        artifact: &Path,
        model: &ModelSource,
    ) -> DomainResult<Arc<dyn InferenceEnginePort>> {
        let engine = OnnxClassifierEngine::load(artifact, model)?;
        info!("Sesión ONNX creada desde {}", artifact.display());
        Ok(Arc::new(engine))
    }
}

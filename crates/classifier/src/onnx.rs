use std::path::{Path, PathBuf};

use image::RgbImage;
use supermango_core::classifier::SeverityClassifier;
use supermango_core::error::CoreError;
use supermango_core::leaf::INPUT_SIZE;
use supermango_core::severity::NUM_CLASSES;
use tract_onnx::prelude::*;

type LeafPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Failed to load model {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Inference failed: {0}")]
    Inference(#[source] anyhow::Error),

    #[error("Model produced {0} scores, expected {NUM_CLASSES}")]
    OutputShape(usize),

    #[error("Model produced a non-finite score at class {0}")]
    NonFiniteScore(usize),
}

impl From<ClassifierError> for CoreError {
    fn from(err: ClassifierError) -> Self {
        CoreError::ClassifierUnavailable(err.to_string())
    }
}

/// Four-class leaf severity model loaded from an ONNX file.
pub struct OnnxSeverityClassifier {
    name: String,
    plan: LeafPlan,
}

impl std::fmt::Debug for OnnxSeverityClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxSeverityClassifier")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl OnnxSeverityClassifier {
    /// Load, fix the input shape to `[1, 3, INPUT_SIZE, INPUT_SIZE]`, and
    /// optimize the model.
    pub fn load(path: &Path) -> Result<Self, ClassifierError> {
        let side = INPUT_SIZE as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(f32::datum_type(), tvec!(1, 3, side, side)),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|source| ClassifierError::Load {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "onnx".to_string());

        tracing::info!(model = %name, path = %path.display(), "Leaf severity model loaded");
        Ok(Self { name, plan })
    }

    fn scores(&self, image: &RgbImage) -> Result<Vec<f32>, ClassifierError> {
        let input = image_to_tensor(image);
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(ClassifierError::Inference)?;

        let scores: Vec<f32> = outputs[0]
            .to_array_view::<f32>()
            .map_err(ClassifierError::Inference)?
            .iter()
            .copied()
            .collect();

        check_scores(&scores)?;
        Ok(scores)
    }
}

impl SeverityClassifier for OnnxSeverityClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, image: &RgbImage) -> Result<usize, CoreError> {
        let scores = self.scores(image)?;
        Ok(argmax(&scores))
    }
}

/// Convert an RGB raster to a `[1, 3, H, W]` tensor scaled to `[0, 1]`.
///
/// No mean/std normalization: the model was trained on plain `[0, 1]`
/// pixels.
pub fn image_to_tensor(image: &RgbImage) -> Tensor {
    let (width, height) = image.dimensions();
    tract_ndarray::Array4::from_shape_fn(
        (1, 3, height as usize, width as usize),
        |(_, c, y, x)| image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
    )
    .into()
}

/// Reject output of the wrong width or containing NaN/infinite scores.
pub fn check_scores(scores: &[f32]) -> Result<(), ClassifierError> {
    if scores.len() != NUM_CLASSES {
        return Err(ClassifierError::OutputShape(scores.len()));
    }
    if let Some(idx) = scores.iter().position(|s| !s.is_finite()) {
        return Err(ClassifierError::NonFiniteScore(idx));
    }
    Ok(())
}

/// Index of the highest score; the first one wins on ties.
pub fn argmax(scores: &[f32]) -> usize {
    let mut best = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = i;
        }
    }
    best
}

//! Batch assessment: classify every leaf in a request and summarize.

use crate::classifier::SeverityClassifier;
use crate::error::CoreError;
use crate::leaf::LeafImage;
use crate::severity::{summarize, LeafPrediction, SeverityClass, SeveritySummary, MAX_SEVERITY};

/// Per-image predictions (in input order) and their summary.
#[derive(Debug, Clone)]
pub struct BatchAssessment {
    pub predictions: Vec<LeafPrediction>,
    pub summary: SeveritySummary,
}

/// Decode, prepare and classify a single image.
pub fn assess_leaf(
    classifier: &dyn SeverityClassifier,
    idx: usize,
    bytes: &[u8],
) -> Result<LeafPrediction, CoreError> {
    let leaf = LeafImage::decode(bytes).map_err(|e| match e {
        CoreError::InvalidInput(msg) => CoreError::InvalidInput(format!("image {idx}: {msg}")),
        other => other,
    })?;

    let raw = classifier.classify(&leaf.prepare())?;
    if raw > MAX_SEVERITY {
        return Err(CoreError::ClassifierUnavailable(format!(
            "{} returned class {raw} for image {idx}, expected 0..={MAX_SEVERITY}",
            classifier.name()
        )));
    }
    let class = SeverityClass::from_index(raw)?;

    tracing::info!(
        idx,
        width = leaf.width(),
        height = leaf.height(),
        label = class.label(),
        "Classified leaf image"
    );

    Ok(LeafPrediction::new(idx, class))
}

/// Assess an ordered batch of encoded images.
///
/// The batch must not be empty. Prediction `i` always belongs to image `i`,
/// and the first failing image aborts the whole batch.
pub fn assess_batch<B: AsRef<[u8]>>(
    classifier: &dyn SeverityClassifier,
    images: &[B],
) -> Result<BatchAssessment, CoreError> {
    if images.is_empty() {
        return Err(CoreError::InvalidInput(
            "at least one leaf image is required".into(),
        ));
    }

    tracing::info!(images = images.len(), "Assessing leaf batch");

    let predictions = images
        .iter()
        .enumerate()
        .map(|(idx, bytes)| assess_leaf(classifier, idx, bytes.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let classes: Vec<SeverityClass> = predictions.iter().map(|p| p.class).collect();
    let summary = summarize(&classes)?;

    tracing::info!(
        images = predictions.len(),
        psi = summary.percent_severity_index,
        overall = summary.overall.label(),
        "Batch summary"
    );

    Ok(BatchAssessment {
        predictions,
        summary,
    })
}

//! Assemble the full prescription for one request.

use serde::Serialize;

use crate::advisory::{AdvisoryTable, Recommendation};
use crate::batch::assess_batch;
use crate::classifier::SeverityClassifier;
use crate::error::CoreError;
use crate::severity::LeafPrediction;
use crate::weather::WeatherReading;

/// Response payload for a prescription request.
#[derive(Debug, Clone, Serialize)]
pub struct Prescription {
    pub percent_severity_index: f64,
    pub overall_label: &'static str,
    pub overall_severity_index: usize,
    pub weather: WeatherReading,
    pub recommendation: Recommendation,
    /// Per-image results, only when the caller asks for them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictions: Option<Vec<LeafPrediction>>,
}

/// Classify the batch, then recommend treatment for its overall severity.
///
/// Weather is validated before any image is decoded.
pub fn prescribe<B: AsRef<[u8]>>(
    classifier: &dyn SeverityClassifier,
    advisories: &AdvisoryTable,
    images: &[B],
    weather: WeatherReading,
    include_predictions: bool,
) -> Result<Prescription, CoreError> {
    weather.validate()?;

    let batch = assess_batch(classifier, images)?;
    let overall = batch.summary.overall;

    let recommendation = advisories.recommend(
        overall.index(),
        weather.humidity,
        weather.temperature,
        weather.wetness,
    )?;

    Ok(Prescription {
        percent_severity_index: batch.summary.percent_severity_index,
        overall_label: overall.label(),
        overall_severity_index: overall.index(),
        weather,
        recommendation,
        predictions: include_predictions.then_some(batch.predictions),
    })
}

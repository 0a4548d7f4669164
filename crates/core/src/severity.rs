//! Severity classes and batch aggregation.
//!
//! The classifier assigns every leaf image one of four ordered classes. A
//! batch is summarized into a percent severity index (how far the batch has
//! progressed towards "every leaf severe") and one overall class.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Number of classes the leaf model predicts.
pub const NUM_CLASSES: usize = 4;

/// Highest (worst) class index.
pub const MAX_SEVERITY: usize = NUM_CLASSES - 1;

/// Disease progression stage of a single leaf. Higher is worse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityClass {
    Healthy,
    Mild,
    Moderate,
    Severe,
}

impl SeverityClass {
    /// All classes in index order.
    pub const ALL: [SeverityClass; NUM_CLASSES] = [
        SeverityClass::Healthy,
        SeverityClass::Mild,
        SeverityClass::Moderate,
        SeverityClass::Severe,
    ];

    /// Map a class index in `[0, MAX_SEVERITY]` to its class.
    pub fn from_index(idx: usize) -> Result<Self, CoreError> {
        Self::ALL.get(idx).copied().ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "severity index must be between 0 and {MAX_SEVERITY}, got {idx}"
            ))
        })
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityClass::Healthy => "Healthy",
            SeverityClass::Mild => "Mild",
            SeverityClass::Moderate => "Moderate",
            SeverityClass::Severe => "Severe",
        }
    }
}

impl fmt::Display for SeverityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One classified image, in the position it arrived in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafPrediction {
    pub idx: usize,
    #[serde(rename = "severity", serialize_with = "serialize_class_index")]
    pub class: SeverityClass,
    pub label: &'static str,
}

impl LeafPrediction {
    pub fn new(idx: usize, class: SeverityClass) -> Self {
        Self {
            idx,
            class,
            label: class.label(),
        }
    }
}

fn serialize_class_index<S: serde::Serializer>(
    class: &SeverityClass,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(class.index() as u64)
}

/// Batch-level severity derived from the per-image classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeveritySummary {
    /// `sum / (MAX_SEVERITY * count) * 100`, two decimals, in `[0, 100]`.
    pub percent_severity_index: f64,
    /// Mean class rounded to the nearest index, ties to even.
    pub overall: SeverityClass,
}

/// Summarize a non-empty batch of classes.
///
/// The overall class is the rounded arithmetic mean. Ties round half to
/// even, so a mean of 1.5 becomes `Moderate` and 0.5 becomes `Healthy`.
pub fn summarize(classes: &[SeverityClass]) -> Result<SeveritySummary, CoreError> {
    if classes.is_empty() {
        return Err(CoreError::InvalidInput(
            "at least one leaf image is required".into(),
        ));
    }

    let count = classes.len() as f64;
    let sum: usize = classes.iter().map(|c| c.index()).sum();
    let sum = sum as f64;

    let psi = round_to_hundredths(sum / (MAX_SEVERITY as f64 * count) * 100.0);

    // The mean of values in [0, MAX_SEVERITY] stays in that range.
    let mean_idx = (sum / count).round_ties_even() as usize;
    let overall = SeverityClass::from_index(mean_idx.min(MAX_SEVERITY))?;

    Ok(SeveritySummary {
        percent_severity_index: psi,
        overall,
    })
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

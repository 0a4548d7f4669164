//! Advisory table and the weather-aware recommender.
//!
//! The horticultural text lives in `data/advisories.json`, one entry per
//! `(severity, risk)` pair. The table is validated once when it is loaded:
//! all [`ADVISORY_ENTRY_COUNT`] pairs must be present exactly once with
//! non-empty text, so a lookup on a validated table cannot miss.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::severity::{SeverityClass, NUM_CLASSES};
use crate::weather::{classify_risk, RiskTier};

/// Built-in table compiled into the binary.
pub const BUILTIN_ADVISORIES_JSON: &str = include_str!("../data/advisories.json");

/// One advisory per severity class and risk tier.
pub const ADVISORY_ENTRY_COUNT: usize = NUM_CLASSES * RiskTier::ALL.len();

/// Action steps and the reasoning behind them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub advice: String,
    pub info: String,
}

/// The recommendation returned to the grower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub severity_label: &'static str,
    pub weather_risk: &'static str,
    pub advice: String,
    pub info: String,
}

/// On-disk shape of a table entry.
#[derive(Debug, Deserialize)]
struct AdvisoryRecord {
    severity: SeverityClass,
    risk: RiskTier,
    advice: String,
    info: String,
}

/// Complete, immutable `(severity, risk) -> advisory` table.
#[derive(Debug, Clone)]
pub struct AdvisoryTable {
    entries: HashMap<(SeverityClass, RiskTier), Advisory>,
}

impl AdvisoryTable {
    /// Load the table compiled into the binary.
    pub fn builtin() -> Result<Self, CoreError> {
        Self::from_json_str(BUILTIN_ADVISORIES_JSON)
    }

    /// Load and validate a table from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Configuration(format!(
                "failed to read advisory table {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&raw)
    }

    /// Parse and validate a table from JSON text.
    pub fn from_json_str(raw: &str) -> Result<Self, CoreError> {
        let records: Vec<AdvisoryRecord> = serde_json::from_str(raw)
            .map_err(|e| CoreError::Configuration(format!("malformed advisory table: {e}")))?;

        let mut entries = HashMap::with_capacity(ADVISORY_ENTRY_COUNT);
        for record in records {
            let key = (record.severity, record.risk);
            if record.advice.trim().is_empty() || record.info.trim().is_empty() {
                return Err(CoreError::Configuration(format!(
                    "advisory for ({}, {}) has empty text",
                    key.0, key.1
                )));
            }
            let advisory = Advisory {
                advice: record.advice,
                info: record.info,
            };
            if entries.insert(key, advisory).is_some() {
                return Err(CoreError::Configuration(format!(
                    "duplicate advisory for ({}, {})",
                    key.0, key.1
                )));
            }
        }

        let table = Self { entries };
        table.verify_complete()?;
        Ok(table)
    }

    /// Check that every severity/risk pair has an advisory.
    pub fn verify_complete(&self) -> Result<(), CoreError> {
        let missing: Vec<String> = SeverityClass::ALL
            .iter()
            .flat_map(|&s| RiskTier::ALL.iter().map(move |&r| (s, r)))
            .filter(|key| !self.entries.contains_key(key))
            .map(|(s, r)| format!("({s}, {r})"))
            .collect();

        if !missing.is_empty() {
            return Err(CoreError::Configuration(format!(
                "advisory table is missing {} of {ADVISORY_ENTRY_COUNT} entries: {}",
                missing.len(),
                missing.join(", ")
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, severity: SeverityClass, risk: RiskTier) -> Result<&Advisory, CoreError> {
        self.entries.get(&(severity, risk)).ok_or_else(|| {
            CoreError::Configuration(format!("no advisory for ({severity}, {risk})"))
        })
    }

    /// Recommend treatment for a severity index under the given weather.
    pub fn recommend(
        &self,
        severity_idx: usize,
        humidity: f64,
        temperature: f64,
        wetness: f64,
    ) -> Result<Recommendation, CoreError> {
        let severity = SeverityClass::from_index(severity_idx)?;
        let risk = classify_risk(temperature, humidity, wetness);
        let advisory = self.lookup(severity, risk)?;

        Ok(Recommendation {
            severity_label: severity.label(),
            weather_risk: risk.label(),
            advice: advisory.advice.clone(),
            info: advisory.info.clone(),
        })
    }
}

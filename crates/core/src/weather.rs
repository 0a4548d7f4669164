//! Weather readings and the anthracnose risk classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Risk thresholds
// ---------------------------------------------------------------------------

/// Humidity (% RH) at or above which a warm, wet spell is high risk.
pub const HIGH_RISK_MIN_HUMIDITY: f64 = 95.0;
/// Upper temperature bound (°C) shared by both high-risk rules.
pub const HIGH_RISK_MAX_TEMPERATURE: f64 = 30.0;

/// Classic rule: 25–30 °C with at least 12 h of leaf wetness.
pub const CLASSIC_MIN_TEMPERATURE: f64 = 25.0;
pub const CLASSIC_MIN_WETNESS: f64 = 12.0;

/// Rain-then-sun rule: 22–30 °C with at least 6 h of leaf wetness.
pub const RAIN_SUN_MIN_TEMPERATURE: f64 = 22.0;
pub const RAIN_SUN_MIN_WETNESS: f64 = 6.0;

/// Below any of these the weather is low risk.
pub const LOW_RISK_TEMPERATURE: f64 = 22.0;
pub const LOW_RISK_HUMIDITY: f64 = 85.0;
pub const LOW_RISK_WETNESS: f64 = 6.0;

// ---------------------------------------------------------------------------
// Accepted input ranges
// ---------------------------------------------------------------------------

pub const MIN_TEMPERATURE: f64 = -50.0;
pub const MAX_TEMPERATURE: f64 = 60.0;

/// Likelihood that current weather spreads the disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify ambient conditions into a risk tier.
///
/// The high-risk rules are checked before the low-risk rule; a reading that
/// satisfies both resolves to `High`.
pub fn classify_risk(temperature: f64, humidity: f64, wetness: f64) -> RiskTier {
    let classic = (CLASSIC_MIN_TEMPERATURE..=HIGH_RISK_MAX_TEMPERATURE).contains(&temperature)
        && humidity >= HIGH_RISK_MIN_HUMIDITY
        && wetness >= CLASSIC_MIN_WETNESS;
    let rain_then_sun = (RAIN_SUN_MIN_TEMPERATURE..=HIGH_RISK_MAX_TEMPERATURE)
        .contains(&temperature)
        && humidity >= HIGH_RISK_MIN_HUMIDITY
        && wetness >= RAIN_SUN_MIN_WETNESS;

    if classic || rain_then_sun {
        return RiskTier::High;
    }
    if temperature < LOW_RISK_TEMPERATURE || humidity < LOW_RISK_HUMIDITY || wetness < LOW_RISK_WETNESS
    {
        return RiskTier::Low;
    }
    RiskTier::Medium
}

/// Weather and location reported alongside a leaf batch.
///
/// `lat` and `lon` are echoed back to the client and never used in a
/// decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Relative humidity, %.
    pub humidity: f64,
    /// Air temperature, °C.
    pub temperature: f64,
    /// Hours the leaf surface stayed wet.
    pub wetness: f64,
    pub lat: f64,
    pub lon: f64,
}

impl WeatherReading {
    /// Reject non-finite or physically impossible values.
    pub fn validate(&self) -> Result<(), CoreError> {
        let fields = [
            ("humidity", self.humidity),
            ("temperature", self.temperature),
            ("wetness", self.wetness),
            ("lat", self.lat),
            ("lon", self.lon),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CoreError::InvalidInput(format!(
                    "{name} must be a finite number, got {value}"
                )));
            }
        }

        validate_range(self.humidity, 0.0, 100.0, "humidity")?;
        validate_range(self.temperature, MIN_TEMPERATURE, MAX_TEMPERATURE, "temperature")?;
        if self.wetness < 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "wetness must not be negative, got {}",
                self.wetness
            )));
        }
        validate_range(self.lat, -90.0, 90.0, "lat")?;
        validate_range(self.lon, -180.0, 180.0, "lon")?;
        Ok(())
    }

    pub fn risk_tier(&self) -> RiskTier {
        classify_risk(self.temperature, self.humidity, self.wetness)
    }
}

fn validate_range(value: f64, min: f64, max: f64, name: &str) -> Result<(), CoreError> {
    if !(min..=max).contains(&value) {
        return Err(CoreError::InvalidInput(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

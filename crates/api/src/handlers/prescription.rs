//! Handler for the leaf-batch prescription endpoint.
//!
//! Accepts `multipart/form-data` with one or more `files` parts (leaf
//! photos) and the text fields `humidity`, `temperature`, `wetness`, `lat`
//! and `lon`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use supermango_core::prescription::{prescribe, Prescription};
use supermango_core::weather::WeatherReading;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Multipart field carrying leaf image bytes.
pub const FIELD_FILES: &str = "files";

/// Query parameters for the prescription endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PrescriptionParams {
    /// Include per-image predictions in the response.
    #[serde(default)]
    pub include_predictions: bool,
}

/// Weather fields collected while walking the multipart stream.
#[derive(Debug, Default)]
struct WeatherFields {
    humidity: Option<f64>,
    temperature: Option<f64>,
    wetness: Option<f64>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl WeatherFields {
    fn slot(&mut self, name: &str) -> Option<&mut Option<f64>> {
        match name {
            "humidity" => Some(&mut self.humidity),
            "temperature" => Some(&mut self.temperature),
            "wetness" => Some(&mut self.wetness),
            "lat" => Some(&mut self.lat),
            "lon" => Some(&mut self.lon),
            _ => None,
        }
    }

    fn into_reading(self) -> AppResult<WeatherReading> {
        Ok(WeatherReading {
            humidity: required(self.humidity, "humidity")?,
            temperature: required(self.temperature, "temperature")?,
            wetness: required(self.wetness, "wetness")?,
            lat: required(self.lat, "lat")?,
            lon: required(self.lon, "lon")?,
        })
    }
}

/// Keep the body-limit rejection distinct from a malformed body.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

fn required(value: Option<f64>, name: &str) -> AppResult<f64> {
    value.ok_or_else(|| AppError::BadRequest(format!("Missing form field '{name}'")))
}

/// POST /api/v1/prescriptions (also POST /getPrescription)
///
/// Classifies every uploaded leaf, aggregates the batch, and returns the
/// recommendation for the overall severity under the reported weather.
pub async fn create(
    State(state): State<AppState>,
    Query(params): Query<PrescriptionParams>,
    mut multipart: Multipart,
) -> AppResult<Json<Prescription>> {
    let max_images = state.config.max_images_per_request;
    let mut images: Vec<Bytes> = Vec::new();
    let mut weather = WeatherFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == FIELD_FILES {
            if images.len() >= max_images {
                return Err(AppError::BadRequest(format!(
                    "At most {max_images} images are accepted per request"
                )));
            }
            let data = field
                .bytes()
                .await
                .map_err(multipart_error)?;
            images.push(data);
            continue;
        }

        let Some(slot) = weather.slot(&name) else {
            tracing::debug!(field = %name, "Ignoring unknown form field");
            continue;
        };
        if slot.is_some() {
            return Err(AppError::BadRequest(format!(
                "Form field '{name}' was sent more than once"
            )));
        }
        let text = field
            .text()
            .await
            .map_err(multipart_error)?;
        let value: f64 = text.trim().parse().map_err(|_| {
            AppError::BadRequest(format!("Form field '{name}' must be a number, got '{text}'"))
        })?;
        *slot = Some(value);
    }

    let weather = weather.into_reading()?;
    tracing::info!(images = images.len(), "Received leaf batch");

    // Decoding and inference are CPU-bound; keep them off the async workers.
    let classifier = Arc::clone(&state.classifier);
    let advisories = Arc::clone(&state.advisories);
    let include_predictions = params.include_predictions;
    let prescription = tokio::task::spawn_blocking(move || {
        prescribe(
            classifier.as_ref(),
            &advisories,
            &images,
            weather,
            include_predictions,
        )
    })
    .await
    .map_err(|e| AppError::InternalError(format!("Inference task failed: {e}")))??;

    tracing::debug!(
        response = %serde_json::to_string_pretty(&prescription).unwrap_or_default(),
        "Prescription response"
    );

    Ok(Json(prescription))
}

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::{ImageFormat, Rgb, RgbImage};
use tower::ServiceExt;

use supermango_api::config::ServerConfig;
use supermango_api::router::build_app_router;
use supermango_api::state::AppState;
use supermango_core::advisory::AdvisoryTable;
use supermango_core::classifier::SeverityClassifier;
use supermango_core::error::CoreError;

pub const BOUNDARY: &str = "supermango-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        model_path: PathBuf::from("unused.onnx"),
        advisory_table_path: None,
        max_images_per_request: 4,
        max_upload_bytes: 10 * 1024 * 1024,
    }
}

/// Reads the severity class from the red channel of a uniform test leaf:
/// 0, 70, 140, 210 map to classes 0..=3.
pub struct StubClassifier;

impl SeverityClassifier for StubClassifier {
    fn name(&self) -> &str {
        "stub"
    }

    fn classify(&self, image: &RgbImage) -> Result<usize, CoreError> {
        let red = image.get_pixel(image.width() / 2, image.height() / 2)[0];
        Ok(((red as usize) + 35) / 70)
    }
}

/// Always fails, as a crashed inference session would.
pub struct FailingClassifier;

impl SeverityClassifier for FailingClassifier {
    fn name(&self) -> &str {
        "failing"
    }

    fn classify(&self, _image: &RgbImage) -> Result<usize, CoreError> {
        Err(CoreError::ClassifierUnavailable("inference session closed".into()))
    }
}

pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(StubClassifier))
}

/// Build the full application router, with all middleware layers, around
/// the given classifier and the built-in advisory table.
pub fn build_test_app_with(classifier: Arc<dyn SeverityClassifier>) -> Router {
    let config = test_config();
    let advisories = AdvisoryTable::builtin().unwrap();
    let state = AppState::new(config.clone(), classifier, advisories);
    build_app_router(state, &config)
}

/// Encode a uniform PNG leaf the stub classifies as `class`.
pub fn leaf_png(class: u8) -> Vec<u8> {
    let img = RgbImage::from_pixel(48, 36, Rgb([class * 70, 150, 50]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// One part of a multipart body.
pub enum Part {
    File(Vec<u8>),
    Text(&'static str, String),
}

/// Weather form fields: humidity, temperature, wetness, lat, lon.
pub fn weather_parts(humidity: f64, temperature: f64, wetness: f64) -> Vec<Part> {
    vec![
        Part::Text("humidity", humidity.to_string()),
        Part::Text("temperature", temperature.to_string()),
        Part::Text("wetness", wetness.to_string()),
        Part::Text("lat", "16.4".to_string()),
        Part::Text("lon", "120.6".to_string()),
    ]
}

pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for (i, part) in parts.iter().enumerate() {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File(bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"files\"; filename=\"leaf{i}.png\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, parts: &[Part]) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

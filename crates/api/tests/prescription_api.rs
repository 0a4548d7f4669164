//! Integration tests for the prescription endpoint.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, leaf_png, post_multipart, weather_parts, Part};

const ENDPOINT: &str = "/api/v1/prescriptions";

fn batch(classes: &[u8], weather: Vec<Part>) -> Vec<Part> {
    let mut parts: Vec<Part> = classes.iter().map(|&c| Part::File(leaf_png(c))).collect();
    parts.extend(weather);
    parts
}

// ---------------------------------------------------------------------------
// Test: a mixed batch under high-risk weather
// ---------------------------------------------------------------------------

#[tokio::test]
async fn prescription_for_mixed_batch_under_high_risk() {
    let app = common::build_test_app();
    let parts = batch(&[0, 3, 0], weather_parts(96.0, 27.0, 13.0));

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["percent_severity_index"], 33.33);
    assert_eq!(json["overall_label"], "Mild");
    assert_eq!(json["overall_severity_index"], 1);
    assert_eq!(json["recommendation"]["severity_label"], "Mild");
    assert_eq!(json["recommendation"]["weather_risk"], "High");
    assert!(json["recommendation"]["advice"]
        .as_str()
        .unwrap()
        .starts_with("1. Within 24 h"));
    assert!(json.get("predictions").is_none());
}

// ---------------------------------------------------------------------------
// Test: weather fields are echoed unchanged
// ---------------------------------------------------------------------------

#[tokio::test]
async fn weather_is_echoed_unchanged() {
    let app = common::build_test_app();
    let parts = batch(&[2], weather_parts(90.0, 24.0, 8.0));

    let json = body_json(post_multipart(app, ENDPOINT, &parts).await).await;
    assert_eq!(json["weather"]["humidity"], 90.0);
    assert_eq!(json["weather"]["temperature"], 24.0);
    assert_eq!(json["weather"]["wetness"], 8.0);
    assert_eq!(json["weather"]["lat"], 16.4);
    assert_eq!(json["weather"]["lon"], 120.6);
    assert_eq!(json["percent_severity_index"], 66.67);
    assert_eq!(json["recommendation"]["weather_risk"], "Medium");
}

// ---------------------------------------------------------------------------
// Test: per-image predictions on request, in upload order
// ---------------------------------------------------------------------------

#[tokio::test]
async fn predictions_returned_in_upload_order_when_requested() {
    let app = common::build_test_app();
    let parts = batch(&[3, 1, 2], weather_parts(80.0, 20.0, 3.0));

    let response = post_multipart(
        app,
        "/api/v1/prescriptions?include_predictions=true",
        &parts,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let predictions = json["predictions"].as_array().unwrap();
    let got: Vec<(u64, u64, &str)> = predictions
        .iter()
        .map(|p| {
            (
                p["idx"].as_u64().unwrap(),
                p["severity"].as_u64().unwrap(),
                p["label"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(got, [(0, 3, "Severe"), (1, 1, "Mild"), (2, 2, "Moderate")]);
    assert_eq!(json["recommendation"]["weather_risk"], "Low");
}

// ---------------------------------------------------------------------------
// Test: the legacy mobile path serves the same handler
// ---------------------------------------------------------------------------

#[tokio::test]
async fn legacy_path_is_served() {
    let app = common::build_test_app();
    let parts = batch(&[3], weather_parts(99.0, 18.0, 20.0));

    let response = post_multipart(app, "/getPrescription", &parts).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["percent_severity_index"], 100.0);
    assert_eq!(json["overall_label"], "Severe");
    assert_eq!(json["recommendation"]["weather_risk"], "Low");
}

// ---------------------------------------------------------------------------
// Test: a batch with no images is a client error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_batch_returns_400() {
    let app = common::build_test_app();
    let parts = weather_parts(90.0, 24.0, 8.0);

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
}

// ---------------------------------------------------------------------------
// Test: undecodable image bytes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_image_returns_400() {
    let app = common::build_test_app();
    let mut parts = vec![Part::File(leaf_png(1)), Part::File(b"GIF89a-nope".to_vec())];
    parts.extend(weather_parts(90.0, 24.0, 8.0));

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
    assert!(json["error"].as_str().unwrap().contains("image 1"));
}

// ---------------------------------------------------------------------------
// Test: missing and non-numeric weather fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_weather_field_returns_400() {
    let app = common::build_test_app();
    let parts = vec![
        Part::File(leaf_png(0)),
        Part::Text("humidity", "90".into()),
        Part::Text("temperature", "24".into()),
        Part::Text("lat", "16.4".into()),
        Part::Text("lon", "120.6".into()),
    ];

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(json["error"].as_str().unwrap().contains("wetness"));
}

#[tokio::test]
async fn non_numeric_weather_field_returns_400() {
    let app = common::build_test_app();
    let mut parts = vec![Part::File(leaf_png(0))];
    parts.extend(weather_parts(90.0, 24.0, 8.0));
    parts[1] = Part::Text("humidity", "very humid".into());

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: out-of-domain weather values
// ---------------------------------------------------------------------------

#[tokio::test]
async fn negative_humidity_returns_400() {
    let app = common::build_test_app();
    let parts = batch(&[1], weather_parts(-5.0, 24.0, 8.0));

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_INPUT");
    assert!(json["error"].as_str().unwrap().contains("humidity"));
}

// ---------------------------------------------------------------------------
// Test: batch size limit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn too_many_images_returns_400() {
    let app = common::build_test_app();
    // test_config allows 4 images.
    let parts = batch(&[0, 1, 2, 3, 0], weather_parts(90.0, 24.0, 8.0));

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// Test: upload size limit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn oversized_upload_returns_413() {
    let app = common::build_test_app();
    // test_config allows 10 MiB per request.
    let mut parts = vec![Part::File(vec![0u8; 11 * 1024 * 1024])];
    parts.extend(weather_parts(90.0, 24.0, 8.0));

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "PAYLOAD_TOO_LARGE");
}

// ---------------------------------------------------------------------------
// Test: inference failure surfaces as a sanitized server error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn classifier_failure_returns_503() {
    let app = common::build_test_app_with(Arc::new(common::FailingClassifier));
    let parts = batch(&[1], weather_parts(90.0, 24.0, 8.0));

    let response = post_multipart(app, ENDPOINT, &parts).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CLASSIFIER_UNAVAILABLE");
    assert!(!json["error"].as_str().unwrap().contains("session"));
}

// ---------------------------------------------------------------------------
// Test: identical requests produce identical bodies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn identical_requests_are_idempotent() {
    let parts = batch(&[1, 2], weather_parts(96.0, 23.0, 7.0));

    let first = body_json(post_multipart(common::build_test_app(), ENDPOINT, &parts).await).await;
    let second = body_json(post_multipart(common::build_test_app(), ENDPOINT, &parts).await).await;

    assert_eq!(first, second);
    assert_eq!(first["recommendation"]["weather_risk"], "High");
}

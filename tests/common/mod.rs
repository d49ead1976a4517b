#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use predictd::config::{BreastCancerConfig, CharacterConfig};
use predictd::preprocess::ResizeFilter;
use serde_json::{json, Value};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use tower::ServiceExt;

pub const BOUNDARY: &str = "predictd-test-boundary";

/// Canonical order and means used by the breast-cancer fixtures.
pub const MEANS: [(&str, f64); 3] = [
    ("radius_mean", 14.127),
    ("texture_mean", 19.29),
    ("area_mean", 654.89),
];

pub fn write_breast_cancer_artifacts(dir: &Path) -> BreastCancerConfig {
    let means: serde_json::Map<String, Value> = MEANS
        .iter()
        .map(|(name, mean)| (name.to_string(), json!(mean)))
        .collect();
    let config = BreastCancerConfig {
        model_path: dir.join("best_model.json"),
        scaler_path: dir.join("scaler.json"),
        feature_means_path: dir.join("feature_means.json"),
        reject_unknown_features: false,
    };

    fs::write(&config.feature_means_path, Value::Object(means).to_string()).unwrap();
    fs::write(
        &config.scaler_path,
        json!({
            "mean": [14.127, 19.29, 654.89],
            "scale": [3.52, 4.3, 351.9],
            "feature_names": ["radius_mean", "texture_mean", "area_mean"]
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        &config.model_path,
        json!({
            "kind": "linear",
            "classes": [0, 1],
            "coef": [[-2.0, -0.5, -1.5]],
            "intercept": [0.3]
        })
        .to_string(),
    )
    .unwrap();

    config
}

/// Encoder classes; the model predicts encoded 0 for bright images and 2 for dark ones.
pub fn write_character_artifacts(dir: &Path, encoder_classes: &[i64]) -> CharacterConfig {
    let config = CharacterConfig {
        model_path: dir.join("optimized_model.json"),
        pca_path: dir.join("pca_transformer.json"),
        label_encoder_path: dir.join("label_encoder.json"),
        label_map_path: dir.join("emnist_label_map.json"),
        image_width: 28,
        image_height: 28,
        resize_filter: ResizeFilter::CatmullRom,
    };

    let mut first_pixel = vec![0.0; 784];
    first_pixel[0] = 1.0;
    fs::write(
        &config.pca_path,
        json!({
            "mean": vec![0.0; 784],
            "components": [vec![1.0 / 784.0; 784], first_pixel],
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        &config.model_path,
        json!({
            "kind": "linear",
            "classes": [0, 1, 2],
            "coef": [[10.0, 0.0], [-10.0, 0.0], [0.0, 0.0]],
            "intercept": [0.0, 0.0, 1.0]
        })
        .to_string(),
    )
    .unwrap();
    fs::write(
        &config.label_encoder_path,
        json!({ "classes": encoder_classes }).to_string(),
    )
    .unwrap();
    fs::write(
        &config.label_map_path,
        json!({"10": "A", "11": "B", "36": "a"}).to_string(),
    )
    .unwrap();

    config
}

pub fn solid_png(width: u32, height: u32, value: u8) -> Vec<u8> {
    let image = image::DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
        width,
        height,
        image::Luma([value]),
    ));
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("failed to encode png");
    out.into_inner()
}

pub fn multipart_body(field: &str, filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router request failed");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, body)
}

pub async fn send_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("failed to build json request");
    send(app, request).await
}

pub async fn send_upload(app: &Router, field: &str, bytes: &[u8]) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/predict")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, "char.png", bytes)))
        .expect("failed to build multipart request");
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("failed to build empty request");
    send(app, request).await
}

//! Shared fixtures: a small fitted artifact set written to a temp directory.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

pub const SOIL_TYPES: [&str; 5] = ["Black", "Clayey", "Loamy", "Red", "Sandy"];
pub const CROP_TYPES: [&str; 5] = ["Barley", "Cotton", "Maize", "Paddy", "Wheat"];
pub const FERTILIZERS: [&str; 7] = [
    "10-26-26", "14-35-14", "17-17-17", "20-20", "28-28", "DAP", "Urea",
];

/// Two trees over nitrogen (column 5) and phosphorous (column 7).
///
/// For the sample payload (N = 50, P = 50) the averaged distribution is
/// `[0.05, 0.05, 0, 0.05, 0.1, 0, 0.75]`, i.e. Urea at 0.75.
pub fn forest_model() -> Value {
    json!({
        "kind": "random_forest",
        "n_features": 8,
        "classes": [0, 1, 2, 3, 4, 5, 6],
        "trees": [
            { "nodes": [
                { "feature": 5, "threshold": 30.0, "left": 1, "right": 4 },
                { "feature": 7, "threshold": 30.0, "left": 2, "right": 3 },
                { "value": [0, 0, 8, 0, 0, 1, 1] },
                { "value": [0, 0, 0, 0, 0, 9, 1] },
                { "value": [0, 0, 0, 0, 1, 0, 9] }
            ]},
            { "nodes": [
                { "feature": 7, "threshold": 20.0, "left": 1, "right": 2 },
                { "value": [0, 0, 0, 0, 0, 0, 5] },
                { "value": [1, 1, 0, 1, 1, 0, 6] }
            ]}
        ]
    })
}

pub fn centroid_model() -> Value {
    json!({
        "kind": "nearest_centroid",
        "n_features": 8,
        "classes": [5, 6],
        "centroids": [
            [25, 50, 40, 2, 2, 10, 10, 60],
            [30, 60, 40, 4, 4, 80, 20, 10]
        ]
    })
}

fn encoder(classes: &[&str]) -> Value {
    json!({ "classes": classes })
}

fn write(dir: &Path, name: &str, value: &Value) {
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

/// Write a full artifact set using `model` and an optional scaler.
pub fn write_artifacts(dir: &Path, model: &Value, scaler: Option<&Value>) {
    write(dir, "fertilizer_model.json", model);
    write(dir, "soil_encoder.json", &encoder(&SOIL_TYPES));
    write(dir, "crop_encoder.json", &encoder(&CROP_TYPES));
    write(dir, "fertilizer_encoder.json", &encoder(&FERTILIZERS));
    if let Some(scaler) = scaler {
        write(dir, "feature_scaler.json", scaler);
    }
}

pub fn artifact_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path(), &forest_model(), None);
    dir
}

pub fn sample_payload() -> Value {
    json!({
        "temperature": 30,
        "humidity": 60,
        "moisture": 40,
        "soil_type": "Sandy",
        "crop_type": "Wheat",
        "nitrogen": 50,
        "potassium": 50,
        "phosphorous": 50
    })
}

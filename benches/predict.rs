//! End-to-end prediction latency over an in-memory forest.
//!
//! Run with `cargo bench --bench predict`.

use criterion::{Criterion, criterion_group, criterion_main};
use fertirec::{ArtifactStore, FeatureScaler, LabelEncoder, Node, Predictor, RandomForest, Tree};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;

fn labels(names: &[&str]) -> LabelEncoder {
    LabelEncoder::new(names.iter().map(|s| s.to_string()).collect()).unwrap()
}

/// Balanced tree of `depth` levels cycling through the eight columns.
fn synthetic_tree(depth: usize, n_classes: usize, seed: usize) -> Tree {
    let mut nodes = Vec::new();
    let internal = (1usize << depth) - 1;
    for i in 0..internal {
        nodes.push(Node::Split {
            feature: (i + seed) % 8,
            threshold: ((i * 37 + seed * 11) % 100) as f64,
            left: 2 * i + 1,
            right: 2 * i + 2,
        });
    }
    for i in 0..(1usize << depth) {
        let mut value = vec![1.0; n_classes];
        value[(i + seed) % n_classes] += 10.0;
        nodes.push(Node::Leaf { value });
    }
    Tree { nodes }
}

fn predictor(with_scaler: bool) -> Predictor {
    let forest = RandomForest {
        n_features: 8,
        classes: (0..7).collect(),
        trees: (0..100).map(|seed| synthetic_tree(8, 7, seed)).collect(),
    };
    let scaler = with_scaler.then(|| FeatureScaler::Standard {
        mean: vec![50.0; 8],
        scale: vec![25.0; 8],
    });
    let store = ArtifactStore::from_parts(
        Box::new(forest),
        labels(&["Black", "Clayey", "Loamy", "Red", "Sandy"]),
        labels(&["Barley", "Cotton", "Maize", "Paddy", "Wheat"]),
        labels(&["10-26-26", "14-35-14", "17-17-17", "20-20", "28-28", "DAP", "Urea"]),
        scaler,
    )
    .unwrap();
    Predictor::new(Arc::new(store))
}

fn bench_predict(c: &mut Criterion) {
    let payload = json!({
        "temperature": 30, "humidity": 60, "moisture": 40,
        "soil_type": "Sandy", "crop_type": "Wheat",
        "nitrogen": 50, "potassium": 50, "phosphorous": 50
    });

    let mut group = c.benchmark_group("predict");
    for (name, with_scaler) in [("forest_100x8", false), ("forest_100x8_scaled", true)] {
        let predictor = predictor(with_scaler);
        group.bench_function(name, |b| {
            b.iter(|| predictor.predict(black_box(&payload)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_predict);
criterion_main!(benches);

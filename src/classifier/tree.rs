//! Decision trees and random forests with per-leaf class distributions.
//!
//! Trees use a flat node array with node 0 as the root. A split sends a
//! sample left when `x[feature] <= threshold`. Children are always stored
//! after their parent, which rules out cycles.

use super::{Classifier, Prediction, argmax, check_input};
use crate::error::{ArtifactError, ModelError};
use serde::{Deserialize, Serialize};

/// A tree node: either a split or a leaf holding class weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class counts (or weights) of the training samples that reached this leaf.
    Leaf { value: Vec<f64> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn check(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        check_nodes(&self.nodes, n_features, n_classes)
    }
}

fn check_nodes(nodes: &[Node], n_features: usize, n_classes: usize) -> Result<(), String> {
    if nodes.is_empty() {
        return Err("tree has no nodes".into());
    }
    let len = nodes.len();
    for (i, node) in nodes.iter().enumerate() {
        match node {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if *feature >= n_features {
                    return Err(format!("node {i} splits on feature {feature}"));
                }
                if !threshold.is_finite() {
                    return Err(format!("node {i} has a non-finite threshold"));
                }
                for child in [*left, *right] {
                    if child <= i || child >= len {
                        return Err(format!("node {i} has invalid child {child}"));
                    }
                }
            }
            Node::Leaf { value } => {
                if value.len() != n_classes {
                    return Err(format!(
                        "leaf {i} has {} weights for {n_classes} classes",
                        value.len()
                    ));
                }
                if value.iter().any(|w| !w.is_finite() || *w < 0.0) {
                    return Err(format!("leaf {i} has a negative or non-finite weight"));
                }
                if value.iter().sum::<f64>() <= 0.0 {
                    return Err(format!("leaf {i} is empty"));
                }
            }
        }
    }
    Ok(())
}

/// Walk to the leaf for `features` and add its normalised distribution into
/// `acc`.
///
/// A path never visits more nodes than the tree holds, so a walk that
/// exceeds that bound is reported as a corrupt tree.
fn accumulate(nodes: &[Node], features: &[f64], acc: &mut [f64]) -> Result<(), ModelError> {
    let mut idx = 0;
    for _ in 0..nodes.len() {
        match nodes.get(idx) {
            Some(Node::Split {
                feature,
                threshold,
                left,
                right,
            }) => {
                let x = features
                    .get(*feature)
                    .ok_or_else(|| ModelError::Corrupt(format!("feature {feature} out of range")))?;
                idx = if *x <= *threshold { *left } else { *right };
            }
            Some(Node::Leaf { value }) => {
                let total: f64 = value.iter().sum();
                if value.len() != acc.len() || total <= 0.0 {
                    return Err(ModelError::Corrupt(format!("leaf {idx} is malformed")));
                }
                for (slot, w) in acc.iter_mut().zip(value) {
                    *slot += w / total;
                }
                return Ok(());
            }
            None => return Err(ModelError::Corrupt(format!("node {idx} does not exist"))),
        }
    }
    Err(ModelError::Corrupt("tree path does not reach a leaf".into()))
}

fn check_header(n_features: usize, classes: &[i64]) -> Result<(), String> {
    if n_features == 0 {
        return Err("model has no input features".into());
    }
    if classes.is_empty() {
        return Err("model has no classes".into());
    }
    Ok(())
}

fn predict_trees<'a>(
    trees: impl ExactSizeIterator<Item = &'a [Node]>,
    classes: &[i64],
    features: &[f64],
) -> Result<Prediction, ModelError> {
    let n = trees.len() as f64;
    let mut proba = vec![0.0; classes.len()];
    for nodes in trees {
        accumulate(nodes, features, &mut proba)?;
    }
    proba.iter_mut().for_each(|p| *p /= n);

    let best = argmax(&proba).ok_or_else(|| ModelError::Corrupt("model has no classes".into()))?;
    Ok(Prediction {
        class_code: classes[best],
        probabilities: Some(proba),
    })
}

/// A bagged ensemble of trees. The probability estimate is the mean of the
/// trees' leaf distributions and the predicted class is its first argmax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub trees: Vec<Tree>,
}

impl RandomForest {
    fn check_structure(&self) -> Result<(), String> {
        check_header(self.n_features, &self.classes)?;
        if self.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(self.n_features, self.classes.len())
                .map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }
}

impl Classifier for RandomForest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn class_codes(&self) -> &[i64] {
        &self.classes
    }

    fn has_probabilities(&self) -> bool {
        true
    }

    fn predict_with_proba(&self, features: &[f64]) -> Result<Prediction, ModelError> {
        check_input(self.n_features, features)?;
        if self.trees.is_empty() {
            return Err(ModelError::Corrupt("forest has no trees".into()));
        }
        let trees = self.trees.iter().map(|tree| tree.nodes.as_slice());
        predict_trees(trees, &self.classes, features)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        self.check_structure().map_err(|reason| ArtifactError::invalid("classifier", reason))
    }
}

/// A single decision tree classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub n_features: usize,
    pub classes: Vec<i64>,
    pub nodes: Vec<Node>,
}

impl DecisionTree {
    fn check_structure(&self) -> Result<(), String> {
        check_header(self.n_features, &self.classes)?;
        check_nodes(&self.nodes, self.n_features, self.classes.len())
    }
}

impl Classifier for DecisionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn class_codes(&self) -> &[i64] {
        &self.classes
    }

    fn has_probabilities(&self) -> bool {
        true
    }

    fn predict_with_proba(&self, features: &[f64]) -> Result<Prediction, ModelError> {
        check_input(self.n_features, features)?;
        predict_trees(std::iter::once(self.nodes.as_slice()), &self.classes, features)
    }

    fn check(&self) -> Result<(), ArtifactError> {
        self.check_structure().map_err(|reason| ArtifactError::invalid("classifier", reason))
    }
}

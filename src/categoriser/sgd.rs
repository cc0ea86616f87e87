//! Multinomial logistic regression trained by seeded mini-batch SGD.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::CategoriserError;

/// Training options for the linear classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainOptions {
    pub epochs: usize,
    pub learning_rate: f32,
    /// L2 regularisation strength.
    pub l2: f32,
    pub batch_size: usize,
    /// RNG seed; training is reproducible for identical input ordering.
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 200,
            learning_rate: 0.1,
            l2: 1e-3,
            batch_size: 32,
            seed: 42,
        }
    }
}

/// A linear model over TF-IDF features exposing per-class probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SgdClassifier {
    /// Class labels in first-seen training order.
    classes: Vec<String>,
    dim: usize,
    /// `classes x dim` weight matrix.
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl SgdClassifier {
    /// Train by minimising log-loss over `x`/`y` with L2 regularisation.
    ///
    /// `y` holds indices into `classes`.
    pub(crate) fn fit(
        x: &[Array1<f32>],
        y: &[usize],
        classes: Vec<String>,
        options: &TrainOptions,
    ) -> Result<Self, CategoriserError> {
        if x.is_empty() || y.is_empty() {
            return Err(CategoriserError::Train("empty training set".into()));
        }
        if x.len() != y.len() {
            return Err(CategoriserError::Train(
                "mismatched training inputs/labels".into(),
            ));
        }
        let n_classes = classes.len();
        if n_classes == 0 {
            return Err(CategoriserError::Train(
                "no classes available for training".into(),
            ));
        }
        let dim = x[0].len();
        if x.iter().any(|row| row.len() != dim) {
            return Err(CategoriserError::Train(
                "inconsistent feature row length".into(),
            ));
        }
        if y.iter().any(|&label| label >= n_classes) {
            return Err(CategoriserError::Train("label index out of range".into()));
        }

        let mut rng = StdRng::seed_from_u64(options.seed);
        let mut weights = Array2::<f32>::zeros((n_classes, dim));
        let mut bias = Array1::<f32>::zeros(n_classes);
        for w in weights.iter_mut() {
            *w = (rng.random::<f32>() - 0.5) * 0.01;
        }

        let mut indices: Vec<usize> = (0..x.len()).collect();
        let batch_size = options.batch_size.max(1);
        let lr = options.learning_rate;
        let l2 = options.l2.max(0.0);

        for _epoch in 0..options.epochs {
            indices.shuffle(&mut rng);
            for chunk in indices.chunks(batch_size) {
                let mut grad_w = Array2::<f32>::zeros((n_classes, dim));
                let mut grad_b = Array1::<f32>::zeros(n_classes);
                for &idx in chunk {
                    let xi = &x[idx];
                    let yi = y[idx];
                    let logits = weights.dot(xi) + &bias;
                    let probs = softmax(&logits);
                    for c in 0..n_classes {
                        let diff = probs[c] - if c == yi { 1.0 } else { 0.0 };
                        grad_w.row_mut(c).scaled_add(diff, xi);
                        grad_b[c] += diff;
                    }
                }

                let inv = 1.0 / chunk.len() as f32;
                for c in 0..n_classes {
                    for i in 0..dim {
                        let l2_term = l2 * weights[[c, i]];
                        weights[[c, i]] -= lr * (grad_w[[c, i]] * inv + l2_term);
                    }
                    bias[c] -= lr * grad_b[c] * inv;
                }
            }
        }

        Ok(Self {
            classes,
            dim,
            weights,
            bias,
        })
    }

    /// Compute class probabilities for a single feature vector.
    pub(crate) fn predict_proba(&self, features: &Array1<f32>) -> Result<Vec<f32>, CategoriserError> {
        if features.len() != self.dim {
            return Err(CategoriserError::Prediction(format!(
                "feature dimension {} does not match model dimension {}",
                features.len(),
                self.dim
            )));
        }
        let logits = self.weights.dot(features) + &self.bias;
        Ok(softmax(&logits).to_vec())
    }

    pub(crate) fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Check model dimensions after deserialisation.
    pub(crate) fn validate(&self) -> Result<(), CategoriserError> {
        if self.classes.is_empty() {
            return Err(CategoriserError::MalformedState("no classes defined".into()));
        }
        if self.weights.dim() != (self.classes.len(), self.dim) {
            return Err(CategoriserError::MalformedState(format!(
                "weights shape {:?} does not match {} classes x {} features",
                self.weights.dim(),
                self.classes.len(),
                self.dim
            )));
        }
        if self.bias.len() != self.classes.len() {
            return Err(CategoriserError::MalformedState(
                "bias length mismatch".into(),
            ));
        }
        if self.weights.iter().chain(self.bias.iter()).any(|w| !w.is_finite()) {
            return Err(CategoriserError::MalformedState(
                "non-finite model parameter".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn dim(&self) -> usize {
        self.dim
    }
}

/// Numerically-stable softmax over a logit vector.
fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    if logits.is_empty() {
        return Array1::zeros(0);
    }
    let max = logits.fold(f32::NEG_INFINITY, |a, &b| a.max(b));
    let mut exps = logits.mapv(|v| (v - max).exp());
    let sum = exps.sum();
    if sum == 0.0 {
        return Array1::from_elem(logits.len(), 1.0 / logits.len() as f32);
    }
    exps /= sum;
    exps
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn toy_data() -> (Vec<Array1<f32>>, Vec<usize>, Vec<String>) {
        // Two linearly separable classes on two features.
        let x = vec![
            array![1.0, 0.0],
            array![0.9, 0.1],
            array![0.0, 1.0],
            array![0.1, 0.9],
        ];
        let y = vec![0, 0, 1, 1];
        let classes = vec!["first".to_string(), "second".to_string()];
        (x, y, classes)
    }

    #[test]
    fn probabilities_sum_to_one() {
        let (x, y, classes) = toy_data();
        let model = SgdClassifier::fit(&x, &y, classes, &TrainOptions::default()).unwrap();
        let probs = model.predict_proba(&array![0.5, 0.5]).unwrap();
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn learns_separable_classes() {
        let (x, y, classes) = toy_data();
        let model = SgdClassifier::fit(&x, &y, classes, &TrainOptions::default()).unwrap();
        let probs = model.predict_proba(&array![1.0, 0.0]).unwrap();
        assert!(probs[0] > probs[1]);
        let probs = model.predict_proba(&array![0.0, 1.0]).unwrap();
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn fixed_seed_reproduces_training() {
        let (x, y, classes) = toy_data();
        let options = TrainOptions::default();
        let a = SgdClassifier::fit(&x, &y, classes.clone(), &options).unwrap();
        let b = SgdClassifier::fit(&x, &y, classes, &options).unwrap();
        let input = array![0.3, 0.7];
        assert_eq!(
            a.predict_proba(&input).unwrap(),
            b.predict_proba(&input).unwrap()
        );
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let (x, _, classes) = toy_data();
        let result = SgdClassifier::fit(&x, &[0], classes, &TrainOptions::default());
        assert!(matches!(result, Err(CategoriserError::Train(_))));
    }

    #[test]
    fn rejects_wrong_dimension_at_predict() {
        let (x, y, classes) = toy_data();
        let model = SgdClassifier::fit(&x, &y, classes, &TrainOptions::default()).unwrap();
        let result = model.predict_proba(&array![1.0]);
        assert!(matches!(result, Err(CategoriserError::Prediction(_))));
    }
}

//! The primary categoriser variant: TF-IDF features into an SGD-trained
//! linear model.

use std::collections::HashMap;

use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::CategoriserError;
use super::pipeline::{tokenize, TfidfVectorizer};
use super::sgd::{SgdClassifier, TrainOptions};
use super::{check_examples, threshold_suggestions, Categoriser, CategoriserInfo, LabeledExample, Prediction};

const STATE_FORMAT_VERSION: u32 = 1;

/// Trained state persisted as the opaque model blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TfidfSgdState {
    format_version: u32,
    vectorizer: TfidfVectorizer,
    classifier: SgdClassifier,
}

/// Categorises descriptions with a TF-IDF bag-of-words pipeline and a
/// linear classifier trained by SGD on log-loss.
#[derive(Debug, Clone)]
pub struct TfidfSgdCategoriser {
    options: TrainOptions,
    state: Option<TfidfSgdState>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<TfidfSgdCategoriser>();
    }
};

impl TfidfSgdCategoriser {
    /// Stable registry identifier for this implementation.
    pub const NAME: &'static str = "tfidf-sgd";

    /// Create an untrained categoriser with default training options.
    pub fn new() -> Self {
        Self::with_options(TrainOptions::default())
    }

    /// Create an untrained categoriser with explicit training options.
    pub fn with_options(options: TrainOptions) -> Self {
        Self {
            options,
            state: None,
        }
    }

    /// Rehydrate a categoriser from a serialized state blob.
    ///
    /// Unparseable or internally inconsistent blobs fail with
    /// [`CategoriserError::MalformedState`]; a default model is never
    /// silently substituted.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CategoriserError> {
        let state: TfidfSgdState = serde_json::from_slice(data)?;
        if state.format_version != STATE_FORMAT_VERSION {
            return Err(CategoriserError::MalformedState(format!(
                "unsupported state format version {}",
                state.format_version
            )));
        }
        state.vectorizer.validate()?;
        state.classifier.validate()?;
        if state.classifier.dim() != state.vectorizer.dim() {
            return Err(CategoriserError::MalformedState(format!(
                "classifier expects {} features but vocabulary has {}",
                state.classifier.dim(),
                state.vectorizer.dim()
            )));
        }
        Ok(Self {
            options: TrainOptions::default(),
            state: Some(state),
        })
    }

}

impl Default for TfidfSgdCategoriser {
    fn default() -> Self {
        Self::new()
    }
}

impl Categoriser for TfidfSgdCategoriser {
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<(), CategoriserError> {
        check_examples(examples)?;

        let documents: Vec<Vec<String>> = examples
            .iter()
            .map(|example| tokenize(&example.description))
            .collect();
        let vectorizer = TfidfVectorizer::fit(&documents);
        let x: Vec<Array1<f32>> = documents
            .iter()
            .map(|tokens| vectorizer.transform(tokens))
            .collect();

        // Category labels keep first-seen order; the threshold policy relies
        // on it for stable tie-breaking.
        let mut classes: Vec<String> = Vec::new();
        let mut class_index: HashMap<&str, usize> = HashMap::new();
        let mut y = Vec::with_capacity(examples.len());
        for example in examples {
            let next = classes.len();
            let idx = *class_index.entry(example.category.as_str()).or_insert(next);
            if idx == classes.len() {
                classes.push(example.category.clone());
            }
            y.push(idx);
        }

        let classifier = SgdClassifier::fit(&x, &y, classes, &self.options)?;
        info!(
            "fitted {} on {} examples: {} terms, {} categories",
            Self::NAME,
            examples.len(),
            vectorizer.dim(),
            classifier.classes().len()
        );

        self.state = Some(TfidfSgdState {
            format_version: STATE_FORMAT_VERSION,
            vectorizer,
            classifier,
        });
        Ok(())
    }

    fn predict(&self, description: &str) -> Result<Vec<Prediction>, CategoriserError> {
        let state = self.state.as_ref().ok_or(CategoriserError::NotTrained)?;
        let features = state.vectorizer.transform(&tokenize(description));
        let probabilities = state.classifier.predict_proba(&features)?;
        Ok(threshold_suggestions(
            state.classifier.classes(),
            &probabilities,
        ))
    }

    fn to_bytes(&self) -> Result<Vec<u8>, CategoriserError> {
        let state = self.state.as_ref().ok_or(CategoriserError::NotTrained)?;
        Ok(serde_json::to_vec(state)?)
    }

    fn info(&self) -> CategoriserInfo {
        CategoriserInfo {
            implementation: Self::NAME,
            trained: self.state.is_some(),
            categories: self
                .state
                .as_ref()
                .map(|state| state.classifier.classes().to_vec())
                .unwrap_or_default(),
            vocabulary_size: self
                .state
                .as_ref()
                .map(|state| state.vectorizer.dim())
                .unwrap_or(0),
        }
    }
}

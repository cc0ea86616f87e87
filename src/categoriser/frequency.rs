//! Prior-frequency baseline: ranks categories by how often they were seen
//! during training, ignoring the description text entirely.
//!
//! Useful as a floor when judging a real model's validation accuracy.

use log::info;
use serde::{Deserialize, Serialize};

use super::error::CategoriserError;
use super::{check_examples, threshold_suggestions, Categoriser, CategoriserInfo, LabeledExample, Prediction};

const STATE_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FrequencyState {
    format_version: u32,
    /// Category labels in first-seen training order.
    classes: Vec<String>,
    /// Training occurrences per class, aligned with `classes`.
    counts: Vec<u32>,
}

impl FrequencyState {
    fn probabilities(&self) -> Vec<f32> {
        let total: u32 = self.counts.iter().sum();
        self.counts
            .iter()
            .map(|&count| count as f32 / total as f32)
            .collect()
    }

    fn validate(&self) -> Result<(), CategoriserError> {
        if self.classes.is_empty() {
            return Err(CategoriserError::MalformedState("no classes defined".into()));
        }
        if self.classes.len() != self.counts.len() {
            return Err(CategoriserError::MalformedState(
                "class/count length mismatch".into(),
            ));
        }
        if self.counts.iter().sum::<u32>() == 0 {
            return Err(CategoriserError::MalformedState(
                "all class counts are zero".into(),
            ));
        }
        Ok(())
    }
}

/// Baseline categoriser suggesting the most frequent training categories.
#[derive(Debug, Clone, Default)]
pub struct FrequencyCategoriser {
    state: Option<FrequencyState>,
}

impl FrequencyCategoriser {
    /// Stable registry identifier for this implementation.
    pub const NAME: &'static str = "frequency";

    pub fn new() -> Self {
        Self { state: None }
    }

    /// Rehydrate a categoriser from a serialized state blob.
    pub fn from_bytes(data: &[u8]) -> Result<Self, CategoriserError> {
        let state: FrequencyState = serde_json::from_slice(data)?;
        if state.format_version != STATE_FORMAT_VERSION {
            return Err(CategoriserError::MalformedState(format!(
                "unsupported state format version {}",
                state.format_version
            )));
        }
        state.validate()?;
        Ok(Self { state: Some(state) })
    }
}

impl Categoriser for FrequencyCategoriser {
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<(), CategoriserError> {
        check_examples(examples)?;

        let mut classes: Vec<String> = Vec::new();
        let mut counts: Vec<u32> = Vec::new();
        for example in examples {
            match classes.iter().position(|label| label == &example.category) {
                Some(idx) => counts[idx] += 1,
                None => {
                    classes.push(example.category.clone());
                    counts.push(1);
                }
            }
        }
        info!(
            "fitted {} on {} examples across {} categories",
            Self::NAME,
            examples.len(),
            classes.len()
        );

        self.state = Some(FrequencyState {
            format_version: STATE_FORMAT_VERSION,
            classes,
            counts,
        });
        Ok(())
    }

    fn predict(&self, _description: &str) -> Result<Vec<Prediction>, CategoriserError> {
        let state = self.state.as_ref().ok_or(CategoriserError::NotTrained)?;
        Ok(threshold_suggestions(&state.classes, &state.probabilities()))
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
                .map(|state| state.classes.clone())
                .unwrap_or_default(),
            vocabulary_size: 0,
        }
    }
}

use serde::{Deserialize, Serialize};

mod error;
mod frequency;
mod pipeline;
mod sgd;
mod tfidf_sgd;

pub use error::CategoriserError;
pub use frequency::FrequencyCategoriser;
pub use sgd::TrainOptions;
pub use tfidf_sgd::TfidfSgdCategoriser;

/// The confidence cutoff at which a single suggestion is returned.
///
/// If the top category's probability does not exceed this, the policy falls
/// back to a short ranked list of candidates instead.
pub const THRESH: f32 = 0.20;

/// A single labelled training input: a transaction description and the
/// category it was filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub description: String,
    pub category: String,
}

impl LabeledExample {
    pub fn new(description: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
        }
    }
}

/// One ranked category candidate with its raw probability estimate.
///
/// Predictions carry the category *label*; resolution to a live category id
/// happens against a [`crate::CategorySet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub category: String,
    pub probability: f32,
}

/// Information about a categoriser's current state.
#[derive(Debug, Clone)]
pub struct CategoriserInfo {
    /// Stable registry identifier of the implementation.
    pub implementation: &'static str,
    /// Whether the categoriser holds trained state.
    pub trained: bool,
    /// Category labels in training insertion order.
    pub categories: Vec<String>,
    /// Number of vocabulary terms, for implementations that have one.
    pub vocabulary_size: usize,
}

/// Capability set shared by every categoriser variant.
///
/// Implementations are registered under a stable name in
/// [`crate::registry::Implementation`]; deserialisation is per-variant and
/// dispatched there.
pub trait Categoriser {
    /// Train on the full example set, replacing any previous state.
    ///
    /// At least one example is required. A training set with a single
    /// distinct category is valid and degenerates to a constant predictor.
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<(), CategoriserError>;

    /// Rank the known categories for a description and apply the threshold
    /// suggestion policy.
    ///
    /// Fails with [`CategoriserError::NotTrained`] when no state has been
    /// fitted or deserialised; there is no implicit lazy training. Output is
    /// deterministic for fixed state and input.
    fn predict(&self, description: &str) -> Result<Vec<Prediction>, CategoriserError>;

    /// Serialize the trained state to an opaque blob.
    fn to_bytes(&self) -> Result<Vec<u8>, CategoriserError>;

    /// Describe the categoriser's current state.
    fn info(&self) -> CategoriserInfo;
}

/// Apply the threshold suggestion policy to per-category probabilities.
///
/// `probabilities` holds one entry per category in `categories`, which is in
/// training insertion order. Categories are ranked by descending probability
/// (stable, so ties keep insertion order). If the top probability strictly
/// exceeds [`THRESH`], only the top category is returned. Otherwise
/// categories are accumulated in rank order while the running probability
/// total *before* each addition is still below [`THRESH`], so the first
/// candidate is always included and the result is never empty when at least
/// one category is known.
pub(crate) fn threshold_suggestions(categories: &[String], probabilities: &[f32]) -> Vec<Prediction> {
    let mut order: Vec<usize> = (0..categories.len().min(probabilities.len())).collect();
    order.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let Some(&top) = order.first() else {
        return Vec::new();
    };
    if probabilities[top] > THRESH {
        return vec![Prediction {
            category: categories[top].clone(),
            probability: probabilities[top],
        }];
    }

    let mut suggestions = Vec::new();
    let mut running = 0.0f32;
    for &idx in &order {
        if running >= THRESH {
            break;
        }
        suggestions.push(Prediction {
            category: categories[idx].clone(),
            probability: probabilities[idx],
        });
        running += probabilities[idx];
    }
    suggestions
}

/// Shared training-input validation for all variants.
pub(crate) fn check_examples(examples: &[LabeledExample]) -> Result<(), CategoriserError> {
    if examples.is_empty() {
        return Err(CategoriserError::Train("empty training set".into()));
    }
    if let Some(example) = examples.iter().find(|e| e.category.trim().is_empty()) {
        return Err(CategoriserError::Train(format!(
            "example {:?} has a blank category",
            example.description
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn confident_top_yields_single_suggestion() {
        let result = threshold_suggestions(&labels(&["a", "b", "c"]), &[0.3, 0.5, 0.2]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, "b");
        assert_eq!(result[0].probability, 0.5);
    }

    #[test]
    fn top_at_threshold_still_yields_single_candidate() {
        // 0.20 does not strictly exceed THRESH, so the cumulative branch
        // runs; it stops after the first candidate because the running
        // total has reached THRESH.
        let result = threshold_suggestions(&labels(&["a", "b"]), &[0.20, 0.10]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].category, "a");
    }

    #[test]
    fn cumulative_branch_uses_pre_inclusion_total() {
        // running total before adding: a at 0.0, b at 0.19, c at 0.34 -> stop.
        let result = threshold_suggestions(&labels(&["a", "b", "c"]), &[0.19, 0.15, 0.12]);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category, "a");
        assert_eq!(result[1].category, "b");
    }

    #[test]
    fn uniform_probabilities_keep_insertion_order() {
        let probs = [1.0 / 6.0; 6];
        let result = threshold_suggestions(&labels(&["a", "b", "c", "d", "e", "f"]), &probs);
        // 1/6 each: a included at 0.0, b at ~0.167, c stopped at ~0.333.
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].category, "a");
        assert_eq!(result[1].category, "b");
    }

    #[test]
    fn no_categories_yields_empty() {
        assert!(threshold_suggestions(&[], &[]).is_empty());
    }

    #[test]
    fn blank_category_rejected() {
        let examples = vec![LabeledExample::new("COLES", " ")];
        assert!(matches!(
            check_examples(&examples),
            Err(CategoriserError::Train(_))
        ));
    }
}

//! The live category set and resolution of predictions into suggestions.
//!
//! Models learn category *labels*; the external system knows categories by
//! id. A model can outlive a category (categories get renamed or deleted
//! after calibration), so resolution treats a missing category as a soft
//! failure rather than a crash.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::categoriser::{Categoriser, CategoriserError, Prediction};

/// A transaction category known to the live system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// One ranked category candidate with a normalized confidence score.
///
/// This exact shape is consumed by presentation layers outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: i64,
    pub name: String,
    /// Rounded probability estimate, 0-100.
    pub score: u8,
}

/// The set of categories currently live in the external system.
#[derive(Debug, Clone, Default)]
pub struct CategorySet {
    by_name: HashMap<String, Category>,
}

impl CategorySet {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            by_name: categories
                .into_iter()
                .map(|category| (category.name.clone(), category))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Resolve a raw prediction against the live set.
    ///
    /// Fails with [`CategoriserError::CategoryVanished`] when the predicted
    /// category has been deleted since the model was trained.
    pub fn resolve(&self, prediction: &Prediction) -> Result<Suggestion, CategoriserError> {
        let category = self
            .by_name
            .get(&prediction.category)
            .ok_or_else(|| CategoriserError::CategoryVanished(prediction.category.clone()))?;
        Ok(Suggestion {
            id: category.id,
            name: category.name.clone(),
            score: score_from(prediction.probability),
        })
    }

    /// Resolve a ranked prediction list, dropping vanished categories.
    pub fn resolve_all(&self, predictions: &[Prediction]) -> Vec<Suggestion> {
        predictions
            .iter()
            .filter_map(|prediction| match self.resolve(prediction) {
                Ok(suggestion) => Some(suggestion),
                Err(err) => {
                    warn!("skipping suggestion: {}", err);
                    None
                }
            })
            .collect()
    }
}

fn score_from(probability: f32) -> u8 {
    (probability.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Best-effort auto-categorisation for a newly imported transaction.
///
/// A category is assigned only when the model is confident enough for the
/// threshold policy to produce exactly one candidate and that category still
/// exists; otherwise the transaction is left uncategorised.
pub fn auto_categorise<C: Categoriser>(
    categoriser: &C,
    categories: &CategorySet,
    description: &str,
) -> Result<Option<Suggestion>, CategoriserError> {
    let predictions = categoriser.predict(description)?;
    if predictions.len() != 1 {
        return Ok(None);
    }
    match categories.resolve(&predictions[0]) {
        Ok(suggestion) => Ok(Some(suggestion)),
        Err(CategoriserError::CategoryVanished(name)) => {
            warn!("not auto-assigning vanished category {:?}", name);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

//! Accuracy validation of calibrated models against labelled history.

use log::{debug, warn};
use serde::Serialize;

use crate::categories::{CategorySet, Suggestion};
use crate::categoriser::Categoriser;
use crate::record::{ModelRecord, RecordError};

/// A historical transaction offered for validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationExample {
    pub description: String,
    /// Ground-truth category id, if the transaction was ever categorised.
    pub category_id: Option<i64>,
}

/// One mismatch between the model and the recorded ground truth.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailure {
    #[serde(rename = "transaction")]
    pub example: ValidationExample,
    /// The model's top suggestion; `None` when every suggested category has
    /// vanished from the live set.
    pub modelled: Option<Suggestion>,
}

/// Aggregate outcome of replaying a model over labelled history.
///
/// Computed on demand and never persisted. Serialises to the wire shape
/// consumed outside the core: `{count, matched, failed}`.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Number of examples that had a ground-truth category.
    #[serde(rename = "count")]
    pub examined: usize,
    /// Number whose top suggestion matched the ground truth.
    pub matched: usize,
    #[serde(rename = "failed")]
    pub failures: Vec<ValidationFailure>,
}

impl ValidationReport {
    pub fn accuracy(&self) -> f32 {
        if self.examined == 0 {
            0.0
        } else {
            self.matched as f32 / self.examined as f32
        }
    }
}

/// Replay `record`'s predictions over `examples` and compare each top
/// suggestion with the recorded ground truth.
///
/// The record's categoriser is deserialised once. Examples without a
/// ground-truth category are skipped and do not count toward `examined`.
/// Suggestions whose category has vanished from `categories` are dropped
/// before the top suggestion is taken. Failures preserve input order.
pub fn validate(
    record: &ModelRecord,
    categories: &CategorySet,
    examples: &[ValidationExample],
) -> Result<ValidationReport, RecordError> {
    let categoriser = record.categoriser()?;

    let mut report = ValidationReport {
        examined: 0,
        matched: 0,
        failures: Vec::new(),
    };
    for example in examples {
        let Some(expected_id) = example.category_id else {
            continue;
        };
        let predictions = categoriser.predict(&example.description)?;
        let top = categories.resolve_all(&predictions).into_iter().next();
        report.examined += 1;
        match top {
            Some(suggestion) if suggestion.id == expected_id => report.matched += 1,
            top => {
                if top.is_none() {
                    warn!(
                        "no live category for any suggestion on {:?}",
                        example.description
                    );
                }
                report.failures.push(ValidationFailure {
                    example: example.clone(),
                    modelled: top,
                });
            }
        }
    }

    debug!(
        "validated {:?}: {}/{} matched",
        record.name, report.matched, report.examined
    );
    Ok(report)
}

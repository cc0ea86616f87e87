//! Calibrated model records and their lifecycle.
//!
//! A record is the durable owner of a trained categoriser's state across
//! process restarts. The backing store persists records and must serialize
//! writes to a given record id; within the core, a version token rejects
//! recalibrations that raced against another writer instead of silently
//! letting the last one win.

use log::info;
use time::Date;

use crate::categoriser::{Categoriser, CategoriserError, LabeledExample, TrainOptions};
use crate::registry::{AnyCategoriser, Implementation};

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Unknown implementation: {0}")]
    UnknownImplementation(String),
    #[error("Calibration failed: {0}")]
    Calibration(CategoriserError),
    #[error("Version conflict: expected {expected}, record is at {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error(transparent)]
    Categoriser(#[from] CategoriserError),
}

/// A named, versioned snapshot of a trained categoriser.
#[derive(Debug, Clone)]
pub struct ModelRecord {
    /// Assigned by the backing store; `None` until first persisted.
    pub id: Option<i64>,
    pub name: String,
    pub implementation: Implementation,
    pub training_from: Date,
    pub training_to: Date,
    /// Optimistic-concurrency token, bumped on every successful
    /// recalibration.
    pub version: u64,
    state: Vec<u8>,
}

impl ModelRecord {
    /// Train a new categoriser over `examples` and snapshot it.
    ///
    /// `examples` are expected to be the labelled transactions of the
    /// `training_from..=training_to` window; fetching them is the caller's
    /// concern. No record is produced if training or serialization fails.
    pub fn calibrate(
        name: impl Into<String>,
        implementation: &str,
        training_from: Date,
        training_to: Date,
        examples: &[LabeledExample],
        options: TrainOptions,
    ) -> Result<ModelRecord, RecordError> {
        let implementation = Implementation::get_by_name(implementation)?;
        let state = fit_state(implementation, examples, options)?;
        let record = ModelRecord {
            id: None,
            name: name.into(),
            implementation,
            training_from,
            training_to,
            version: 1,
            state,
        };
        info!(
            "calibrated model {:?} ({}) over {} to {}",
            record.name,
            record.implementation.name(),
            record.training_from,
            record.training_to
        );
        Ok(record)
    }

    /// Reassemble a record previously persisted by the backing store.
    pub fn from_parts(
        id: Option<i64>,
        name: impl Into<String>,
        implementation: &str,
        training_from: Date,
        training_to: Date,
        version: u64,
        state: Vec<u8>,
    ) -> Result<ModelRecord, RecordError> {
        Ok(ModelRecord {
            id,
            name: name.into(),
            implementation: Implementation::get_by_name(implementation)?,
            training_from,
            training_to,
            version,
            state,
        })
    }

    /// Re-train over the record's stored window and replace the snapshot.
    ///
    /// `examples` must be re-fetched by the caller for the stored window.
    /// `expected_version` must match the record's current version; a stale
    /// token means another calibration won the race and this one is
    /// rejected. On any failure the existing state is left untouched: the
    /// replacement bytes are fully produced before anything is overwritten.
    pub fn recalibrate(
        &mut self,
        examples: &[LabeledExample],
        options: TrainOptions,
        expected_version: u64,
    ) -> Result<(), RecordError> {
        if expected_version != self.version {
            return Err(RecordError::VersionConflict {
                expected: expected_version,
                actual: self.version,
            });
        }
        let state = fit_state(self.implementation, examples, options)?;
        self.state = state;
        self.version += 1;
        info!(
            "recalibrated model {:?}, now at version {}",
            self.name, self.version
        );
        Ok(())
    }

    /// Rehydrate the trained categoriser from the stored snapshot.
    ///
    /// Each call produces an owned, private copy of the state, so callers
    /// can predict concurrently without coordination.
    pub fn categoriser(&self) -> Result<AnyCategoriser, CategoriserError> {
        self.implementation.from_bytes(&self.state)
    }

    /// The opaque serialized state owned by this record.
    pub fn state(&self) -> &[u8] {
        &self.state
    }
}

fn fit_state(
    implementation: Implementation,
    examples: &[LabeledExample],
    options: TrainOptions,
) -> Result<Vec<u8>, RecordError> {
    let mut categoriser = implementation.create(options);
    categoriser
        .fit(examples)
        .map_err(RecordError::Calibration)?;
    categoriser.to_bytes().map_err(RecordError::Calibration)
}

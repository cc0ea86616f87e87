//! A trainable engine for categorising financial transactions from their
//! free-text descriptions.
//!
//! Descriptions are turned into TF-IDF weighted bag-of-words features and
//! classified by a linear model trained on labelled history. Predictions are
//! filtered through a confidence-threshold policy: one suggestion when the
//! model is confident, a short ranked list of candidates when it is not.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use coinsort::{Categoriser, LabeledExample, TfidfSgdCategoriser};
//!
//! let examples = vec![
//!     LabeledExample::new("COLES SUPERMARKET 0483", "Groceries"),
//!     LabeledExample::new("WOOLWORTHS METRO", "Groceries"),
//!     LabeledExample::new("METRO TRAINS MONTHLY", "Transport"),
//!     LabeledExample::new("MYKI TOP UP", "Transport"),
//! ];
//!
//! let mut categoriser = TfidfSgdCategoriser::new();
//! categoriser.fit(&examples)?;
//!
//! let predictions = categoriser.predict("COLES SUPERMARKET 0099")?;
//! println!("top category: {}", predictions[0].category);
//! # Ok(())
//! # }
//! ```
//!
//! # Calibrated Model Records
//!
//! Trained state is snapshotted into a [`ModelRecord`]: a named, versioned
//! blob tied to the implementation and training window that produced it.
//! Records are what the external store persists, and every prediction site
//! receives one explicitly; there is no ambient "current model".
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use coinsort::{Category, CategorySet, LabeledExample, ModelRecord, TrainOptions, ValidationExample};
//! use time::macros::date;
//!
//! let examples = vec![
//!     LabeledExample::new("COLES SUPERMARKET 0483", "Groceries"),
//!     LabeledExample::new("METRO TRAINS MONTHLY", "Transport"),
//! ];
//! let record = ModelRecord::calibrate(
//!     "september",
//!     "tfidf-sgd",
//!     date!(2017 - 09 - 01),
//!     date!(2017 - 09 - 30),
//!     &examples,
//!     TrainOptions::default(),
//! )?;
//!
//! let categories = CategorySet::new(vec![
//!     Category { id: 1, name: "Groceries".into() },
//!     Category { id: 2, name: "Transport".into() },
//! ]);
//! let report = coinsort::validate(
//!     &record,
//!     &categories,
//!     &[ValidationExample {
//!         description: "COLES SUPERMARKET 0483".into(),
//!         category_id: Some(1),
//!     }],
//! )?;
//! assert_eq!(report.examined, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! A fitted categoriser owns its state and can be shared across threads
//! behind an `Arc`; deserialising a record produces an owned, private copy
//! per caller, so concurrent predictions need no coordination:
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use coinsort::{Categoriser, LabeledExample, TfidfSgdCategoriser};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let mut categoriser = TfidfSgdCategoriser::new();
//! categoriser.fit(&[
//!     LabeledExample::new("MYKI TOP UP", "Transport"),
//!     LabeledExample::new("COLES SUPERMARKET", "Groceries"),
//! ])?;
//! let categoriser = Arc::new(categoriser);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let categoriser = Arc::clone(&categoriser);
//!     handles.push(thread::spawn(move || {
//!         categoriser.predict("MYKI TOP UP AUTO").unwrap();
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```

pub mod categories;
pub mod categoriser;
pub mod record;
pub mod registry;
pub mod validation;

pub use categories::{auto_categorise, Category, CategorySet, Suggestion};
pub use categoriser::{
    Categoriser, CategoriserError, CategoriserInfo, FrequencyCategoriser, LabeledExample,
    Prediction, TfidfSgdCategoriser, TrainOptions, THRESH,
};
pub use record::{ModelRecord, RecordError};
pub use registry::{AnyCategoriser, Implementation};
pub use validation::{validate, ValidationExample, ValidationFailure, ValidationReport};

pub fn init_logger() {
    env_logger::init();
}

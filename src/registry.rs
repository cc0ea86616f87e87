//! Static registry of categoriser implementations.
//!
//! The set of implementations is compiled in; an implementation is selected
//! by its stable string identifier, which is also what a
//! [`crate::ModelRecord`] stores so that serialized state is always
//! rehydrated by the variant that produced it.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::categoriser::{
    Categoriser, CategoriserError, CategoriserInfo, FrequencyCategoriser, LabeledExample,
    Prediction, TfidfSgdCategoriser, TrainOptions,
};
use crate::record::RecordError;

/// The closed set of categoriser implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Implementation {
    /// TF-IDF bag-of-words features into an SGD-trained linear model.
    /// The default.
    TfidfSgd,
    /// Prior label frequencies, description text ignored.
    Frequency,
}

lazy_static! {
    static ref IMPLEMENTATIONS: HashMap<&'static str, Implementation> = {
        let mut table = HashMap::new();
        table.insert(Implementation::TfidfSgd.name(), Implementation::TfidfSgd);
        table.insert(Implementation::Frequency.name(), Implementation::Frequency);
        table
    };
}

impl Implementation {
    /// The stable identifier stored in model records.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TfidfSgd => TfidfSgdCategoriser::NAME,
            Self::Frequency => FrequencyCategoriser::NAME,
        }
    }

    /// Look up a registered implementation by name.
    pub fn get_by_name(name: &str) -> Result<Implementation, RecordError> {
        IMPLEMENTATIONS
            .get(name)
            .copied()
            .ok_or_else(|| RecordError::UnknownImplementation(name.to_string()))
    }

    /// Construct an untrained categoriser of this implementation.
    pub fn create(&self, options: TrainOptions) -> AnyCategoriser {
        match self {
            Self::TfidfSgd => AnyCategoriser::TfidfSgd(TfidfSgdCategoriser::with_options(options)),
            Self::Frequency => AnyCategoriser::Frequency(FrequencyCategoriser::new()),
        }
    }

    /// Rehydrate a categoriser of this implementation from serialized state.
    pub fn from_bytes(&self, data: &[u8]) -> Result<AnyCategoriser, CategoriserError> {
        match self {
            Self::TfidfSgd => Ok(AnyCategoriser::TfidfSgd(TfidfSgdCategoriser::from_bytes(
                data,
            )?)),
            Self::Frequency => Ok(AnyCategoriser::Frequency(FrequencyCategoriser::from_bytes(
                data,
            )?)),
        }
    }
}

/// Tagged dispatch over the closed set of categoriser variants.
#[derive(Debug, Clone)]
pub enum AnyCategoriser {
    TfidfSgd(TfidfSgdCategoriser),
    Frequency(FrequencyCategoriser),
}

impl Categoriser for AnyCategoriser {
    fn fit(&mut self, examples: &[LabeledExample]) -> Result<(), CategoriserError> {
        match self {
            Self::TfidfSgd(categoriser) => categoriser.fit(examples),
            Self::Frequency(categoriser) => categoriser.fit(examples),
        }
    }

    fn predict(&self, description: &str) -> Result<Vec<Prediction>, CategoriserError> {
        match self {
            Self::TfidfSgd(categoriser) => categoriser.predict(description),
            Self::Frequency(categoriser) => categoriser.predict(description),
        }
    }

    fn to_bytes(&self) -> Result<Vec<u8>, CategoriserError> {
        match self {
            Self::TfidfSgd(categoriser) => categoriser.to_bytes(),
            Self::Frequency(categoriser) => categoriser.to_bytes(),
        }
    }

    fn info(&self) -> CategoriserInfo {
        match self {
            Self::TfidfSgd(categoriser) => categoriser.info(),
            Self::Frequency(categoriser) => categoriser.info(),
        }
    }
}

//! Bag-of-words feature pipeline with TF-IDF re-weighting.

use std::collections::{HashMap, HashSet};

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::error::CategoriserError;

/// Tokens shorter than this carry no signal and are dropped.
const MIN_TOKEN_LEN: usize = 2;

/// Split a description into lowercased alphanumeric tokens.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Vocabulary and inverse-document-frequency weights learned during fit.
///
/// Term indices are assigned in first-seen order over the training corpus.
/// Tokens unknown at inference time contribute nothing to the feature
/// vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct TfidfVectorizer {
    /// Term -> feature index.
    vocabulary: HashMap<String, usize>,
    /// Smoothed IDF weight per feature index.
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and IDF weights from tokenized documents.
    pub(crate) fn fit(documents: &[Vec<String>]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<u32> = Vec::new();
        for tokens in documents {
            let mut seen: HashSet<usize> = HashSet::new();
            for token in tokens {
                let next = vocabulary.len();
                let idx = *vocabulary.entry(token.clone()).or_insert(next);
                if idx == doc_freq.len() {
                    doc_freq.push(0);
                }
                if seen.insert(idx) {
                    doc_freq[idx] += 1;
                }
            }
        }

        let n_docs = documents.len() as f32;
        let idf = doc_freq
            .iter()
            .map(|&df| ((1.0 + n_docs) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        Self { vocabulary, idf }
    }

    /// Turn tokens into an L2-normalised TF-IDF vector over the vocabulary.
    pub(crate) fn transform(&self, tokens: &[String]) -> Array1<f32> {
        let mut counts = Array1::<f32>::zeros(self.idf.len());
        for token in tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                counts[idx] += 1.0;
            }
        }
        for (value, &weight) in counts.iter_mut().zip(&self.idf) {
            *value *= weight;
        }
        l2_normalize(counts)
    }

    /// Number of vocabulary terms.
    pub(crate) fn dim(&self) -> usize {
        self.idf.len()
    }

    /// Check internal consistency after deserialisation.
    pub(crate) fn validate(&self) -> Result<(), CategoriserError> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(CategoriserError::MalformedState(format!(
                "vocabulary has {} terms but {} idf weights",
                self.vocabulary.len(),
                self.idf.len()
            )));
        }
        if self.vocabulary.values().any(|&idx| idx >= self.idf.len()) {
            return Err(CategoriserError::MalformedState(
                "vocabulary index out of range".into(),
            ));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(CategoriserError::MalformedState(
                "non-finite idf weight".into(),
            ));
        }
        Ok(())
    }
}

fn l2_normalize(vec: Array1<f32>) -> Array1<f32> {
    let norm: f32 = vec.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        vec / norm
    } else {
        vec
    }
}

use std::fmt;

/// Represents the different types of errors that can occur in the
/// categorisation core.
#[derive(Debug)]
pub enum CategoriserError {
    /// Training input was empty or degenerate
    Train(String),
    /// `predict` was called before any state was fitted or deserialised
    NotTrained,
    /// Error occurred while computing predictions
    Prediction(String),
    /// Serialized state could not be parsed or failed validation
    MalformedState(String),
    /// A suggestion referenced a category that no longer exists
    CategoryVanished(String),
}

impl fmt::Display for CategoriserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Train(msg) => write!(f, "Training error: {}", msg),
            Self::NotTrained => write!(
                f,
                "Categoriser has no trained state; calibrate or deserialise a model first"
            ),
            Self::Prediction(msg) => write!(f, "Prediction error: {}", msg),
            Self::MalformedState(msg) => write!(f, "Malformed serialized state: {}", msg),
            Self::CategoryVanished(name) => write!(f, "Category no longer exists: {}", name),
        }
    }
}

impl std::error::Error for CategoriserError {}

impl From<serde_json::Error> for CategoriserError {
    fn from(err: serde_json::Error) -> Self {
        CategoriserError::MalformedState(err.to_string())
    }
}

//! Error types for ganadero_core.
//!
//! Numeric gaps in reference data never surface here: they fall back to
//! configured defaults. Errors are reserved for inputs the engines cannot
//! substitute, such as an animal whose breed cannot be resolved.

use thiserror::Error;

/// Main error type for engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Breed key or name not present in the registry
    #[error("Breed not found: {0}")]
    BreedNotFound(String),

    /// A required breed was not supplied at all
    #[error("Missing breed: {0}")]
    MissingBreed(String),

    /// Numeric input outside its domain (negative weight, NaN...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error with context
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<EngineError>,
    },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    #[must_use]
    pub fn breed_not_found<S: Into<String>>(key: S) -> Self {
        Self::BreedNotFound(key.into())
    }

    #[must_use]
    pub fn missing_breed<S: Into<String>>(what: S) -> Self {
        Self::MissingBreed(what.into())
    }

    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    #[must_use]
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Wraps an error with additional context.
    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Rejects non-finite or non-positive values.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::invalid_input(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::breed_not_found("wagyu-x");
        assert_eq!(err.to_string(), "Breed not found: wagyu-x");
    }

    #[test]
    fn test_error_context() {
        let err = EngineError::missing_breed("empty breed key").with_context("animal ES0123");
        assert_eq!(err.to_string(), "animal ES0123: Missing breed: empty breed key");
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("weight", 420.0).unwrap(), 420.0);
        assert!(ensure_positive("weight", 0.0).is_err());
        assert!(ensure_positive("weight", f64::NAN).is_err());
    }
}

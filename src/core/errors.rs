//! Error types for the rarity-rs library.
//!
//! Scoring is pure computation, so the taxonomy is small: data-consistency
//! failures in the source collection, tokens with nothing to score, and
//! attribute values whose kind cannot be scored. The remaining variants cover
//! the configuration and snapshot loading that surrounds the scoring core.

use std::io;

use thiserror::Error;

/// Main result type for rarity operations.
pub type Result<T> = std::result::Result<T, RarityError>;

/// Error type for all rarity operations.
#[derive(Error, Debug)]
pub enum RarityError {
    /// The collection's declared frequency counts disagree with its total supply.
    #[error("Data integrity error for attribute '{attribute}': {message}")]
    DataIntegrity {
        /// Attribute name whose counts are inconsistent
        attribute: String,
        /// Error description
        message: String,
    },

    /// A token shares no attribute name with the collection it was scored against.
    #[error("Token '{token_id}' has no attributes in common with the collection")]
    EmptyAttributeSet {
        /// Identifier of the token that produced no attribute scores
        token_id: String,
    },

    /// An attribute value of a kind the scorer cannot key into frequency counts.
    #[error("Unsupported attribute kind for '{attribute}': {kind}")]
    UnsupportedAttributeKind {
        /// Attribute name carrying the value
        attribute: String,
        /// Description of the offending kind or value
        kind: String,
    },

    /// I/O related errors (snapshot and config files)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Mathematical computation errors
    #[error("Mathematical error: {message}")]
    Math {
        /// Error description
        message: String,
        /// Context of the mathematical operation
        context: Option<String>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Validation errors for input data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Field or input that failed validation
        field: Option<String>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
        /// Additional context
        context: Option<String>,
    },

    /// Unsupported operation or input
    #[error("Unsupported: {message}")]
    Unsupported {
        /// Error description
        message: String,
    },
}

impl RarityError {
    /// Create a new data integrity error for an attribute
    pub fn data_integrity(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataIntegrity {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Create a new empty attribute set error for a token
    pub fn empty_attribute_set(token_id: impl Into<String>) -> Self {
        Self::EmptyAttributeSet {
            token_id: token_id.into(),
        }
    }

    /// Create a new unsupported attribute kind error
    pub fn unsupported_kind(attribute: impl Into<String>, kind: impl Into<String>) -> Self {
        Self::UnsupportedAttributeKind {
            attribute: attribute.into(),
            kind: kind.into(),
        }
    }

    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: None,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new mathematical error
    pub fn math(message: impl Into<String>) -> Self {
        Self::Math {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new validation error with field context
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            context: None,
        }
    }

    /// Create a new unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Add context to an existing error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        match &mut self {
            Self::Math { context: ctx, .. } | Self::Internal { context: ctx, .. } => {
                *ctx = Some(context.into());
            }
            Self::Io { message, .. }
            | Self::Serialization { message, .. }
            | Self::Config { message, .. } => {
                *message = format!("{}: {message}", context.into());
            }
            _ => {} // Other variants carry their context in dedicated fields
        }
        self
    }

    /// True for errors that indicate inconsistent source data rather than misuse.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::DataIntegrity { .. }
                | Self::EmptyAttributeSet { .. }
                | Self::UnsupportedAttributeKind { .. }
        )
    }
}

impl From<io::Error> for RarityError {
    fn from(err: io::Error) -> Self {
        Self::io("I/O operation failed", err)
    }
}

impl From<serde_json::Error> for RarityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON serialization failed: {err}"),
            data_type: Some("JSON".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_yaml::Error> for RarityError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error result
    fn context(self, msg: &'static str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<RarityError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }

    fn context(self, msg: &'static str) -> Result<T> {
        self.map_err(|e| e.into().with_context(msg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_integrity_display() {
        let err = RarityError::data_integrity("Background", "counts exceed supply");
        let display = format!("{err}");
        assert!(display.contains("Background"));
        assert!(display.contains("counts exceed supply"));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_empty_attribute_set() {
        let err = RarityError::empty_attribute_set("42");

        if let RarityError::EmptyAttributeSet { token_id } = &err {
            assert_eq!(token_id, "42");
        } else {
            panic!("Expected EmptyAttributeSet error");
        }
        assert!(err.is_data_error());
    }

    #[test]
    fn test_unsupported_kind() {
        let err = RarityError::unsupported_kind("Level", "non-finite number NaN");
        assert!(matches!(err, RarityError::UnsupportedAttributeKind { .. }));
        assert!(format!("{err}").contains("Level"));
    }

    #[test]
    fn test_config_field_error() {
        let err = RarityError::config_field("Invalid value", "min_parallel_batch");

        if let RarityError::Config { message, field } = err {
            assert_eq!(message, "Invalid value");
            assert_eq!(field, Some("min_parallel_batch".to_string()));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_with_context_math_error() {
        let err = RarityError::math("Weight sum is zero").with_context("weighted_geometric_mean");

        if let RarityError::Math { context, .. } = err {
            assert_eq!(context, Some("weighted_geometric_mean".to_string()));
        } else {
            panic!("Expected Math error with context");
        }
    }

    #[test]
    fn test_with_context_leaves_data_errors_alone() {
        let err = RarityError::data_integrity("Hat", "negative").with_context("ignored");

        if let RarityError::DataIntegrity { attribute, message } = err {
            assert_eq!(attribute, "Hat");
            assert_eq!(message, "negative");
        } else {
            panic!("Expected DataIntegrity error");
        }
    }

    #[test]
    fn test_result_ext_io_context() {
        let result: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));

        let err = result
            .with_context(|| "Reading snapshot".to_string())
            .unwrap_err();
        if let RarityError::Io { message, .. } = err {
            assert!(message.starts_with("Reading snapshot"));
        } else {
            panic!("Expected Io error");
        }
    }

    #[test]
    fn test_result_ext_serialization_context() {
        let result = serde_json::from_str::<i32>("invalid json");

        let err = result.context("Parsing snapshot").unwrap_err();
        match err {
            RarityError::Serialization { message, .. } => {
                assert!(message.starts_with("Parsing snapshot: JSON"), "{message}");
            }
            other => panic!("Expected Serialization error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<i32>("invalid json").unwrap_err();
        let err: RarityError = json_err.into();

        if let RarityError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("JSON".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: RarityError = yaml_err.into();
        assert!(matches!(err, RarityError::Serialization { .. }));
        assert!(!err.is_data_error());
    }
}

//! Configuration error types

use std::io;

use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("failed to read config file '{path}': {source}")]
    IoError {
        /// Path to the file
        path: String,
        /// Underlying IO error
        #[source]
        source: io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A tracked entity references a source that is not configured
    #[error("{entity} references unknown source '{source_name}'")]
    UnknownSource {
        /// Entity carrying the reference (e.g., "project 'some-mod'")
        entity: String,
        /// Name of the missing source
        source_name: String,
    },

    /// Cron expression does not parse
    #[error("invalid scheduler cron '{expr}': {message}")]
    InvalidCron {
        /// The offending expression
        expr: String,
        /// Parser message
        message: String,
    },

    /// Two tracked entities share an id
    #[error("duplicate {kind} id '{id}'")]
    DuplicateEntity {
        /// "user" or "project"
        kind: &'static str,
        /// The duplicated id
        id: String,
    },

    /// Validation error - invalid value
    #[error("{component} '{name}' has invalid {field}: {message}")]
    InvalidValue {
        /// Component type (e.g., "source")
        component: &'static str,
        /// Name of the component
        name: String,
        /// Field name
        field: &'static str,
        /// Error message
        message: String,
    },
}

impl ConfigError {
    /// Create an UnknownSource error
    pub fn unknown_source(entity: impl Into<String>, source_name: impl Into<String>) -> Self {
        Self::UnknownSource {
            entity: entity.into(),
            source_name: source_name.into(),
        }
    }

    /// Create an InvalidCron error
    pub fn invalid_cron(expr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCron {
            expr: expr.into(),
            message: message.into(),
        }
    }

    /// Create a DuplicateEntity error
    pub fn duplicate_entity(kind: &'static str, id: impl Into<String>) -> Self {
        Self::DuplicateEntity { kind, id: id.into() }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(
        component: &'static str,
        name: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            component,
            name: name.into(),
            field,
            message: message.into(),
        }
    }
}

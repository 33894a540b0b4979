//! Error types for RackCarbon
//!
//! This module defines all error types used throughout the crate,
//! providing detailed error information for debugging and user feedback.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for RackCarbon operations
#[derive(Error, Debug)]
pub enum RackCarbonError {
    /// Invalid or incomplete server configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A component is missing a required hardware attribute
    #[error("Component '{component}' is missing required attribute '{attribute}'")]
    MissingAttribute {
        component: String,
        attribute: String,
    },

    /// Region identifier not present in the datacenter dataset
    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    /// Component class has no entry in the AFR table
    #[error("No failure rate entry for component class '{0}'")]
    MissingAfr(String),

    /// A savings ratio or rollup could not be computed
    #[error("Computation error: {0}")]
    Computation(String),

    /// Invalid input data (bad samples, counts, or fields)
    #[error("Input error: {0}")]
    Input(String),

    /// A malformed record in a tabular input file
    #[error("Malformed record in '{path}' at line {line}: {message}")]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// I/O error while reading an input file
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error in a config or override file
    #[error("JSON error at '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RackCarbonError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a missing-attribute error
    pub fn missing_attribute(
        component: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self::MissingAttribute {
            component: component.into(),
            attribute: attribute.into(),
        }
    }

    /// Create a computation error
    pub fn computation(message: impl Into<String>) -> Self {
        Self::Computation(message.into())
    }

    /// Create an input error
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    /// Create a malformed-record error with file position
    pub fn malformed(
        path: impl Into<PathBuf>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error indicates a missing lookup key
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, Self::UnknownRegion(_) | Self::MissingAfr(_))
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } | Self::Malformed { path, .. } => {
                Some(path)
            }
            _ => None,
        }
    }
}

/// Result type alias for RackCarbon operations
pub type Result<T> = std::result::Result<T, RackCarbonError>;

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| RackCarbonError::io(path, e))
    }
}

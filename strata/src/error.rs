//! Error types for the strata library.
//!
//! Resolution itself never fails: absence and empty lists are ordinary
//! outcomes. The errors here come from the fallible edges of the crate,
//! which are loading and validating configuration documents.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for operations that may fail with a strata error.
///
/// # Examples
///
/// ```
/// use strata::{Error, Result};
///
/// fn example_operation() -> Result<u16> {
///     Ok(4)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the strata library.
#[derive(Debug, Error)]
pub enum Error {
    /// A document could not be read from disk.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A YAML document could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON document could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration key name is malformed.
    #[error("invalid key name '{name}': {reason}")]
    InvalidKeyName {
        /// The rejected key name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// A document path has an extension that maps to no known format.
    #[error("unsupported document format: {}", path.display())]
    UnsupportedFormat {
        /// The path that could not be mapped to a format.
        path: PathBuf,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },
}

impl Error {
    /// Check if error was caused by document parsing.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata::Error;
    ///
    /// let err: Error = serde_json::from_str::<u8>("nope").unwrap_err().into();
    /// assert!(err.is_parse_error());
    /// ```
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Yaml(_) | Self::Json(_))
    }
}

//! Error taxonomy for paired cost comparisons
//!
//! Every failure is a data-validity or usage error: nothing here is transient,
//! so nothing is retried and no error is downgraded to a warning.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, pairing, or testing cost data
#[derive(Error, Debug)]
pub enum CompareError {
    /// Header row missing, required column absent, or a row too short
    #[error("Schema error in {origin}: {reason}")]
    Schema { origin: String, reason: String },

    /// A `total_cost` field that is not a finite real number
    #[error("Parse error in {origin} at line {line}: invalid total_cost {value:?}")]
    Parse {
        origin: String,
        line: usize,
        value: String,
    },

    /// Second occurrence of an instance under the `error` duplicate policy
    #[error("Duplicate instance {instance:?} in {origin} (line {line})")]
    DuplicateKey {
        origin: String,
        instance: String,
        line: usize,
    },

    /// No records left after parsing
    #[error("No cost records found in {origin}")]
    EmptyResult { origin: String },

    /// The two result sets do not cover the same instances
    #[error(
        "Instance sets differ: {missing_in_b} instance(s) of {label_a} missing from {label_b}, \
         {missing_in_a} instance(s) of {label_b} missing from {label_a}"
    )]
    Mismatch {
        label_a: String,
        label_b: String,
        /// Identifiers present in B but absent from A
        missing_in_a: usize,
        /// Identifiers present in A but absent from B
        missing_in_b: usize,
    },

    /// A cost outside the domain of the selected transform
    #[error("Domain error: {0}")]
    Domain(String),

    /// Invalid significance level, too few instances, or bad invocation
    #[error("Parameter error: {0}")]
    Parameter(String),

    /// Missing or unreadable input, unwritable output sink
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompareError {
    /// Wrap an I/O error together with the path it concerns
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for comparison operations
pub type Result<T> = std::result::Result<T, CompareError>;

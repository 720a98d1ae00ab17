/*!
 * Error types for the yamt application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

use crate::translation::pipeline::RunSummary;

/// Errors that can occur when talking to a translation provider
///
/// The pipeline never branches on the variant: every provider error is
/// retried and, once the attempts are exhausted, the text is left unchanged.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The call did not complete within the configured timeout
    #[error("Provider call timed out after {0} ms")]
    Timeout(u64),
}

/// Errors raised by the format adapters
#[derive(Error, Debug)]
pub enum FormatError {
    /// The input could not be parsed in the expected format
    #[error("Parse error: {0}")]
    Parse(String),

    /// The translated document could not be written back
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// The units handed to `recompose` do not line up with the original document
    #[error("Unit mismatch: expected {expected} units, got {actual}")]
    UnitMismatch {
        /// Units found when re-reading the original
        expected: usize,
        /// Units supplied by the caller
        actual: usize,
    },
}

/// Errors related to the persistent translation cache
#[derive(Error, Debug)]
pub enum CacheError {
    /// The persisted cache could not be decoded (treated as an empty cache)
    #[error("Cache file {path:?} is corrupt: {reason}")]
    Corrupt {
        /// Cache file location
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// The cache could not be written back to disk
    #[error("Failed to write cache file {path:?}: {reason}")]
    Write {
        /// Cache file location
        path: PathBuf,
        /// Underlying error message
        reason: String,
    },
}

/// Errors that abort or degrade a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Unknown extension, or a format whose support was not compiled in
    #[error("Unsupported or unavailable format: {0}")]
    UnsupportedFormat(String),

    /// The configuration cannot be turned into a working pipeline
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input file does not exist
    #[error("Input file not found: {0:?}")]
    MissingInput(PathBuf),

    /// The input could not be decomposed or the output recomposed
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Reading the input or writing the output failed
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// The output was written but the cache could not be persisted
    #[error("Translation finished but the cache was not saved: {source}")]
    CacheWrite {
        /// Summary of the otherwise completed run
        summary: Box<RunSummary>,
        /// The persistence failure
        #[source]
        source: CacheError,
    },
}

impl PipelineError {
    /// Whether the run was aborted before any output was produced
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::CacheWrite { .. })
    }
}

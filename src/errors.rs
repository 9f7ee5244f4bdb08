/*!
 * Error types for the xlsxwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to the completion endpoint
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
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while loading or saving a workbook
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// The input file does not exist
    #[error("Workbook not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read as a workbook
    #[error("Failed to load workbook {}: {message}", .path.display())]
    Load {
        /// Path of the workbook
        path: PathBuf,
        /// Reader error message
        message: String,
    },

    /// The workbook could not be written
    #[error("Failed to save workbook {}: {message}", .path.display())]
    Save {
        /// Target path
        path: PathBuf,
        /// Writer error message
        message: String,
    },

    /// A cell reference points at a sheet the workbook does not have
    #[error("Sheet index {0} does not exist in workbook")]
    MissingSheet(usize),
}

/// Configuration problems detected before any work starts
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key was provided by file, environment or command line
    #[error("API key is missing (set DEEPSEEK_API_KEY or provider.api_key)")]
    MissingApiKey,

    /// The concurrency cap must be a positive integer
    #[error("max_concurrent_requests must be a positive integer, got {0}")]
    InvalidConcurrency(usize),

    /// The endpoint is not a valid URL
    #[error("Invalid endpoint URL '{endpoint}': {message}")]
    InvalidEndpoint {
        /// Offending endpoint
        endpoint: String,
        /// Parser message
        message: String,
    },

    /// No target language was given
    #[error("Target language cannot be empty")]
    EmptyTargetLanguage,

    /// Sampling temperature outside the accepted range
    #[error("Temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f32),

    /// The HTTP client could not be built
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),

    /// Reading or writing the config file failed
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for this schema
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that end a translation run
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The input workbook could not be loaded
    #[error("Document load error: {0}")]
    DocumentLoad(WorkbookError),

    /// The translated workbook could not be written
    #[error("Document save error: {0}")]
    DocumentSave(WorkbookError),

    /// A remote completion call failed
    #[error("Remote call error: {0}")]
    RemoteCall(#[from] ProviderError),

    /// Invalid settings for the run
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Number of translated results differs from the number of extracted cells
    #[error("Internal error: expected {expected} translated cells, got {actual}")]
    ResultCountMismatch {
        /// Cells extracted
        expected: usize,
        /// Results received
        actual: usize,
    },

    /// The batch worker pool stopped unexpectedly
    #[error("Internal error: {0}")]
    Internal(String),
}

//! Error handling for git-ignore.
//! Defines the error kinds shared by every provider and the client.

use std::io;
use thiserror::Error;

/// Custom error types for git-ignore operations.
///
/// Providers report `ValidationError`, `RetrievalError` and `PersistenceError`.
/// The client wraps exhausted fallback chains in `AggregateError`.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Represents errors in the configuration file or resolved settings
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// No options were given, or an option is not part of the provider's list
    #[error("Validation error: {0}.")]
    ValidationError(String),

    /// A provider could not read or fetch its own data
    #[error("Retrieval error: {0}.")]
    RetrievalError(String),

    /// A provider could not prepare its destination or write an entry
    #[error("Persistence error: {0}.")]
    PersistenceError(String),

    /// Every provider in a chain failed
    #[error("{message}:{}", format_errors(.errors))]
    AggregateError { message: String, errors: Vec<Error> },
}

impl Error {
    /// Returns true for errors that must not trigger provider fallback.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::ValidationError(_))
    }
}

fn format_errors(errors: &[Error]) -> String {
    errors.iter().map(|e| format!("\n  - {e}")).collect()
}

/// Convenience type alias for Results with git-ignore's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}

//! Error handling for dirtemplate.
//! Defines the error type and result alias used throughout the crate.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while copying, renaming, rendering or archiving a template tree.
///
/// Every variant that touches the filesystem carries the path it failed on,
/// so the caller gets a single descriptive message for the first failure.
#[derive(Error, Debug)]
pub enum Error {
    /// A required path argument was empty.
    #[error("{what} path is empty.")]
    EmptyPath { what: &'static str },

    /// The destination must not exist before generation starts.
    #[error("Destination path '{path}' already exists.")]
    DestinationExists { path: PathBuf },

    /// The template source could not be found.
    #[error("Source path '{path}' does not exist: {source}.")]
    SourceNotFound { path: PathBuf, source: io::Error },

    /// Filesystem operation failed on a specific path.
    #[error("Cannot {op} '{path}': {source}.")]
    Io { op: &'static str, path: PathBuf, source: io::Error },

    /// Plain I/O error without path context (stdin, config handling).
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Errors reported by the template engine.
    #[error("Template error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// Rendering a file of the destination tree failed.
    #[error("Cannot render file '{path}': {source}")]
    RenderFileError { path: PathBuf, source: Box<Error> },

    /// Rendering one side of a rename rule failed.
    #[error("Cannot process rename rule '{rule}': {source}")]
    RenameRuleError { rule: String, source: Box<Error> },

    /// A rendered path is not a usable relative path.
    #[error("Invalid rendered path '{path}' for rule '{rule}'.")]
    InvalidRenderedPath { rule: String, path: String },

    /// Moving a path according to a rename rule failed.
    #[error("Cannot rename/move '{from}' to '{to}': {reason}.")]
    RenameError { from: PathBuf, to: PathBuf, reason: String },

    /// Represents errors that occur during configuration parsing or processing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Writing a tar.gz archive failed.
    #[error("Cannot create archive '{path}': {reason}.")]
    ArchiveError { path: PathBuf, reason: String },
}

impl Error {
    /// Builds a closure attaching the operation and path to an [`io::Error`].
    pub(crate) fn io<P: Into<PathBuf>>(op: &'static str, path: P) -> impl FnOnce(io::Error) -> Error {
        let path = path.into();
        move |source| Error::Io { op, path, source }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}

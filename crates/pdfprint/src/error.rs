use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while unlocking a protected PDF.
///
/// Unlock failures are fatal to a session: no [`crate::Session`] is created.
#[derive(Debug, Error)]
pub enum UnlockError {
    #[error("incorrect password")]
    WrongPassword,

    #[error("failed to unlock the PDF: {0}")]
    CorruptOrUnreadable(String),
}

/// Errors produced while parsing a page-range expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid page range: {0}")]
    InvalidRange(String),

    #[error("invalid page: {0}")]
    InvalidPage(String),

    #[error("no valid pages to print")]
    EmptyAfterFilter,
}

/// Errors produced while assembling print options from user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("number of copies must be a positive integer, got {0:?}")]
    InvalidCopies(String),

    #[error("no pages selected")]
    NoPages,
}

/// The printing subsystem reported no destinations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no printers detected")]
pub struct NoPrintersError;

/// Errors reported by the printing subsystem.
///
/// Messages are surfaced as-is; the core does not interpret them.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed: {message}")]
    Failed { command: String, message: String },

    #[error("unexpected output from {command}: {output:?}")]
    UnexpectedOutput { command: String, output: String },

    #[error("failed to write decrypted copy to {path:?}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any error that can end a single print attempt.
#[derive(Debug, Error)]
pub enum PrintError {
    #[error(transparent)]
    Unlock(#[from] UnlockError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    NoPrinters(#[from] NoPrintersError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

/// A non-fatal warning emitted when the decrypted copy could not be removed.
///
/// By the time this is produced the print job has already been handled.
#[derive(Debug, Clone)]
pub struct CleanupWarning {
    /// Path of the decrypted copy that was left behind.
    pub path: PathBuf,
    /// Reason the file could not be deleted.
    pub reason: String,
}

impl std::fmt::Display for CleanupWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "could not delete the temporary file {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

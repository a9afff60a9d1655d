//! Error types for the Gridsheet application

use gridsheet_core::GridsheetError;
use thiserror::Error;

/// Errors from parsing or running a `:` command.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Core(#[from] GridsheetError),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Unsaved changes! Use :q! to force quit or :wq to save and quit")]
    UnsavedChanges,

    #[error("Clipboard is empty")]
    ClipboardEmpty,
}

pub type Result<T> = std::result::Result<T, CommandError>;

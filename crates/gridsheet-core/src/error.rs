//! Error types for Gridsheet core.

use gridsheet_engine::engine::CellRef;
use thiserror::Error;

/// Errors that can occur while editing a document.
///
/// Every variant is recoverable: the failing operation leaves the document
/// exactly as it was.
#[derive(Error, Debug)]
pub enum GridsheetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid cell reference: {0}")]
    InvalidAddress(String),

    #[error("Cell {0} has no content to transform")]
    MissingCell(CellRef),

    #[error("Sheet index {index} out of range ({count} sheets)")]
    SheetIndexOutOfRange { index: usize, count: usize },

    #[error("Division by zero: average of an empty range")]
    DivisionByZero,

    #[error("No sheet selected")]
    NoActiveSheet,

    #[error("No cell selected")]
    NoActiveCell,

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("No file path set")]
    NoFilePath,
}

impl From<serde_json::Error> for GridsheetError {
    fn from(err: serde_json::Error) -> Self {
        GridsheetError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GridsheetError>;

//! gridsheet-core - UI-agnostic document model + storage.

pub mod document;
pub mod error;
pub mod storage;

pub use document::{Document, FormatChange, Function, FunctionOutcome, Sheet, ToolbarState};
pub use error::{GridsheetError, Result};

pub use gridsheet_engine::engine::CellRef;

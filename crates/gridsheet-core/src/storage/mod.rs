//! Workbook file formats.

pub mod json;

pub use json::{MAX_WORKBOOK_FILE_BYTES, parse_sheets, read_sheets, write_sheets, write_sheets_content};

//! JSON workbook format: an array of `{ "name": ..., "data": { "A1": {...} } }`.

use crate::document::Sheet;
use crate::error::{GridsheetError, Result};
use std::fs;
use std::path::Path;

pub const MAX_WORKBOOK_FILE_BYTES: u64 = 16 * 1_048_576; // 16 MiB

/// Read and parse a workbook file.
pub fn read_sheets(path: &Path) -> Result<Vec<Sheet>> {
    let meta = fs::metadata(path)?;
    if meta.len() > MAX_WORKBOOK_FILE_BYTES {
        return Err(GridsheetError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: workbook too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_WORKBOOK_FILE_BYTES
            ),
        )));
    }
    let content = fs::read_to_string(path)?;
    parse_sheets(&content)
}

/// Parse workbook JSON. Invalid addresses and malformed fields are `Parse` errors.
pub fn parse_sheets(content: &str) -> Result<Vec<Sheet>> {
    let sheets: Vec<Sheet> = serde_json::from_str(content)?;
    Ok(sheets)
}

/// Write sheets to a workbook file.
pub fn write_sheets(path: &Path, sheets: &[Sheet]) -> Result<()> {
    let content = write_sheets_content(sheets)?;
    fs::write(path, content)?;
    Ok(())
}

/// Pretty-printed workbook JSON.
pub fn write_sheets_content(sheets: &[Sheet]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sheets)?)
}

use super::{Document, Sheet};
use crate::error::{GridsheetError, Result};
use crate::storage::{parse_sheets, read_sheets, write_sheets, write_sheets_content};
use std::path::{Path, PathBuf};

impl Document {
    /// Open `path` if it exists, otherwise start empty with `path` as the
    /// save target.
    pub fn with_file(path: Option<PathBuf>) -> Result<Self> {
        let mut doc = Self::new();
        if let Some(ref p) = path {
            if p.exists() {
                doc.import_from(p)?;
            } else {
                doc.file_path = Some(p.clone());
                doc.modified = false;
            }
        }
        Ok(doc)
    }

    /// The whole collection as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String> {
        write_sheets_content(&self.sheets)
    }

    /// Write the collection to `path`.
    pub fn export_to(&mut self, path: &Path) -> Result<()> {
        write_sheets(path, &self.sheets)?;
        self.modified = false;
        log::info!("exported {} sheets to {}", self.sheets.len(), path.display());
        Ok(())
    }

    /// Save to the current file path.
    /// Returns the path saved to.
    pub fn save_file(&mut self) -> Result<PathBuf> {
        let Some(path) = self.file_path.clone() else {
            return Err(GridsheetError::NoFilePath);
        };
        self.export_to(&path)?;
        Ok(path)
    }

    /// Replace the whole collection from JSON text.
    ///
    /// On error nothing changes. On success the first sheet (if any) becomes
    /// active, the focus is cleared and the document counts as unmodified.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let sheets = match parse_sheets(text) {
            Ok(sheets) => sheets,
            Err(err) => {
                log::warn!("import failed: {}", err);
                return Err(err);
            }
        };
        Ok(self.replace_sheets(sheets))
    }

    /// Replace the whole collection from a workbook file, which also becomes
    /// the save target.
    pub fn import_from(&mut self, path: &Path) -> Result<usize> {
        let sheets = match read_sheets(path) {
            Ok(sheets) => sheets,
            Err(err) => {
                log::warn!("import of {} failed: {}", path.display(), err);
                return Err(err);
            }
        };
        let count = self.replace_sheets(sheets);
        self.file_path = Some(path.to_path_buf());
        log::info!("imported {} sheets from {}", count, path.display());
        Ok(count)
    }

    fn replace_sheets(&mut self, sheets: Vec<Sheet>) -> usize {
        let count = sheets.len();
        self.active_sheet = if count == 0 { None } else { Some(0) };
        self.sheets = sheets;
        self.active_cell = None;
        self.modified = false;
        count
    }
}

use crate::error::{GridsheetError, Result};
use gridsheet_engine::engine::{Cell, CellRef, CellStore, FontFamily, FontSize, Rgb, TextAlign};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A named sheet and its cells.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub data: CellStore,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            data: CellStore::new(),
        }
    }
}

/// Snapshot of the formatting controls for the active cell.
///
/// Front ends render their toolbar from this value only; they change state
/// exclusively through the [`Document`] mutation methods.
#[derive(Clone, Debug, PartialEq)]
pub struct ToolbarState {
    pub address: CellRef,
    pub content: String,
    pub font_family: FontFamily,
    pub font_size: FontSize,
    pub is_bold: bool,
    pub is_italic: bool,
    pub is_underlined: bool,
    pub text_align: TextAlign,
    pub color: Rgb,
    pub background_color: Rgb,
}

impl ToolbarState {
    fn from_cell(address: CellRef, cell: Cell) -> Self {
        ToolbarState {
            address,
            content: cell.content,
            font_family: cell.font_family,
            font_size: cell.font_size,
            is_bold: cell.is_bold,
            is_italic: cell.is_italic,
            is_underlined: cell.is_underlined,
            text_align: cell.text_align,
            color: cell.color,
            background_color: cell.background_color,
        }
    }
}

/// UI-agnostic application state for the spreadsheet.
///
/// Holds the sheet collection, the active sheet and the active cell. Every
/// mutation builds a new cell store from the active one and swaps it in only
/// once the operation has succeeded, so a failed operation never leaves a
/// half-applied change behind.
#[derive(Clone, Debug, Default)]
pub struct Document {
    /// Sheets in tab order
    pub(crate) sheets: Vec<Sheet>,
    /// Index of the displayed sheet; `None` until a sheet exists
    pub(crate) active_sheet: Option<usize>,
    /// Address focused for editing/formatting
    pub(crate) active_cell: Option<CellRef>,
    /// Where `save_file` exports to
    pub file_path: Option<PathBuf>,
    /// Whether the collection changed since the last import/export
    pub modified: bool,
}

impl Document {
    /// Create an empty document with no sheets.
    ///
    /// This constructor is side-effect free: it does not touch the filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active_sheet
    }

    pub fn active_sheet(&self) -> Option<&Sheet> {
        self.active_sheet.and_then(|i| self.sheets.get(i))
    }

    pub fn active_store(&self) -> Option<&CellStore> {
        self.active_sheet().map(|s| &s.data)
    }

    pub fn active_cell(&self) -> Option<CellRef> {
        self.active_cell
    }

    /// Append `Sheet {n+1}` and make it active. Returns its index.
    pub fn create_sheet(&mut self) -> usize {
        let index = self.sheets.len();
        let name = format!("Sheet {}", index + 1);
        log::debug!("creating sheet {:?} at index {}", name, index);
        self.sheets.push(Sheet::new(name));
        self.active_sheet = Some(index);
        self.modified = true;
        index
    }

    /// Make the sheet at `index` active.
    pub fn select_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(GridsheetError::SheetIndexOutOfRange {
                index,
                count: self.sheets.len(),
            });
        }
        self.active_sheet = Some(index);
        Ok(())
    }

    /// Activate the next sheet, wrapping to the first.
    pub fn select_next_sheet(&mut self) -> Result<usize> {
        let count = self.sheets.len();
        if count == 0 {
            return Err(GridsheetError::NoActiveSheet);
        }
        let next = self.active_sheet.map_or(0, |i| (i + 1) % count);
        self.select_sheet(next)?;
        Ok(next)
    }

    /// Activate the previous sheet, wrapping to the last.
    pub fn select_previous_sheet(&mut self) -> Result<usize> {
        let count = self.sheets.len();
        if count == 0 {
            return Err(GridsheetError::NoActiveSheet);
        }
        let prev = self.active_sheet.map_or(count - 1, |i| (i + count - 1) % count);
        self.select_sheet(prev)?;
        Ok(prev)
    }

    /// Focus a cell. Focusing alone never creates a record.
    pub fn focus_cell(&mut self, cell_ref: CellRef) {
        self.active_cell = Some(cell_ref);
    }

    /// The record at `cell_ref` on the active sheet, or the default record.
    pub fn get_or_default(&self, cell_ref: &CellRef) -> Cell {
        self.active_store()
            .map(|store| store.get_or_default(cell_ref))
            .unwrap_or_default()
    }

    /// Formatting controls for the active cell, if one is focused.
    pub fn toolbar_state(&self) -> Option<ToolbarState> {
        let address = self.active_cell?;
        Some(ToolbarState::from_cell(address, self.get_or_default(&address)))
    }

    pub(crate) fn require_store(&self) -> Result<&CellStore> {
        self.active_store().ok_or(GridsheetError::NoActiveSheet)
    }

    pub(crate) fn require_cell(&self) -> Result<CellRef> {
        self.active_cell.ok_or(GridsheetError::NoActiveCell)
    }

    /// Swap in a new store for the active sheet.
    pub(crate) fn replace_active_store(&mut self, store: CellStore) -> Result<()> {
        let index = self.active_sheet.ok_or(GridsheetError::NoActiveSheet)?;
        let sheet = self
            .sheets
            .get_mut(index)
            .ok_or(GridsheetError::NoActiveSheet)?;
        sheet.data = store;
        self.modified = true;
        Ok(())
    }
}

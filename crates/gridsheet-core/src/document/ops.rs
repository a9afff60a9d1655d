use super::Document;
use crate::error::{GridsheetError, Result};
use gridsheet_engine::builtins::{self, TextTransform};
use gridsheet_engine::engine::{CellRef, is_valid_input};

impl Document {
    /// Set typed content of a cell on the active sheet.
    ///
    /// Only empty, numeric or alphabetic input is accepted; anything else is
    /// rejected with [`GridsheetError::InvalidInput`] and the cell is untouched.
    pub fn set_content(&mut self, cell_ref: CellRef, value: &str) -> Result<()> {
        let store = self.require_store()?;
        if !is_valid_input(value) {
            log::warn!("rejected input {:?} for {}", value, cell_ref);
            return Err(GridsheetError::InvalidInput(format!(
                "'{}' is not a number or plain text",
                value
            )));
        }
        let mut next = store.clone();
        next.entry(cell_ref).content = value.to_string();
        log::debug!("set {} = {:?}", cell_ref, value);
        self.replace_active_store(next)
    }

    /// Set typed content of the active cell.
    pub fn set_active_content(&mut self, value: &str) -> Result<()> {
        let cell_ref = self.require_cell()?;
        self.set_content(cell_ref, value)
    }

    /// Copy the content of `source` into `target`, leaving every other field
    /// and the source itself unchanged. Dropping a cell onto itself is a no-op.
    pub fn move_content(&mut self, source: CellRef, target: CellRef) -> Result<()> {
        let store = self.require_store()?;
        if source == target {
            return Ok(());
        }
        let mut next = store.clone();
        next.entry(target).content = store.content(&source).to_string();
        log::debug!("moved content {} -> {}", source, target);
        self.replace_active_store(next)
    }

    /// Content of the active cell, for the clipboard.
    pub fn copy_active(&self) -> Result<String> {
        let store = self.require_store()?;
        let cell_ref = self.require_cell()?;
        Ok(store.content(&cell_ref).to_string())
    }

    /// Content of the active cell, which is then cleared.
    pub fn cut_active(&mut self) -> Result<String> {
        let store = self.require_store()?;
        let cell_ref = self.require_cell()?;
        let text = store.content(&cell_ref).to_string();
        let mut next = store.clone();
        next.entry(cell_ref).content.clear();
        self.replace_active_store(next)?;
        log::debug!("cut {} ({} bytes)", cell_ref, text.len());
        Ok(text)
    }

    /// Write clipboard text into the active cell. Pasted text is not validated.
    pub fn paste_active(&mut self, text: &str) -> Result<()> {
        let store = self.require_store()?;
        let cell_ref = self.require_cell()?;
        let mut next = store.clone();
        next.entry(cell_ref).content = text.to_string();
        log::debug!("pasted {} bytes into {}", text.len(), cell_ref);
        self.replace_active_store(next)
    }

    /// Apply TRIM / UPPER / LOWER to the active cell.
    pub fn transform_active(&mut self, transform: TextTransform) -> Result<()> {
        let store = self.require_store()?;
        let cell_ref = self.require_cell()?;
        let cell = store
            .get(&cell_ref)
            .ok_or(GridsheetError::MissingCell(cell_ref))?;
        let content = transform.apply(&cell.content);
        let mut next = store.clone();
        next.entry(cell_ref).content = content;
        log::debug!("{} on {}", transform.name(), cell_ref);
        self.replace_active_store(next)
    }

    /// Drop every record whose content repeats an earlier one.
    /// Returns the number of records removed.
    pub fn remove_duplicates(&mut self) -> Result<usize> {
        let store = self.require_store()?;
        let next = builtins::remove_duplicates(store);
        let removed = store.len() - next.len();
        self.replace_active_store(next)?;
        log::debug!("removed {} duplicate cells", removed);
        Ok(removed)
    }

    /// Literal find/replace over the active sheet.
    /// Returns the number of cells changed.
    pub fn find_and_replace(&mut self, search: &str, replace: &str) -> Result<usize> {
        let store = self.require_store()?;
        if search.is_empty() {
            return Err(GridsheetError::InvalidInput(
                "search text must not be empty".to_string(),
            ));
        }
        let (next, changed) = builtins::find_and_replace(store, search, replace);
        if changed > 0 {
            self.replace_active_store(next)?;
        }
        log::debug!("replaced {:?} with {:?} in {} cells", search, replace, changed);
        Ok(changed)
    }
}

//! Application state and logic.
//!
//! [`App`] wraps the [`Document`] with everything the terminal front end
//! needs on top: cursor and viewport, edit/command buffers, column widths,
//! the pending move and the help modal. The app is modal like Vim, see
//! [`Mode`].

use crate::clipboard::{ClipboardProvider, MemoryClipboard, SystemClipboard};
use crate::command::{self, Command, Outcome};
use crate::error::Result;
use gridsheet_core::{CellRef, Document, FormatChange};
use gridsheet_engine::engine::{FontFamily, FontSize, MAX_COLS, MAX_ROWS, TextAlign};
use std::collections::HashMap;
use std::path::PathBuf;

use super::keymap::Keymap;

const MIN_COL_WIDTH: usize = 4;
const MAX_COL_WIDTH: usize = 50;

/// Modal editing state for the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Navigate the grid, single-key actions.
    Normal,
    /// Edit the content of the focused cell.
    Edit,
    /// Enter `:` commands.
    Command,
}

/// Main application state container.
pub struct App {
    pub doc: Document,
    pub cursor_col: usize,
    pub cursor_row: usize,
    pub viewport_col: usize,
    pub viewport_row: usize,
    pub visible_cols: usize,
    pub visible_rows: usize,
    pub max_cols: usize,
    pub max_rows: usize,
    pub mode: Mode,
    /// Edit buffer for cell editing
    pub edit_buffer: String,
    /// Cursor position within edit buffer (byte offset)
    pub edit_cursor: usize,
    pub command_buffer: String,
    pub command_cursor: usize,
    pub status_message: String,
    /// Default column width
    pub col_width: usize,
    /// Per-column overrides (column index -> width)
    pub column_widths: HashMap<usize, usize>,
    /// Cell picked up for a move; dropped on the next `MoveContent`
    pub move_source: Option<CellRef>,
    pub help_modal: bool,
    pub help_scroll: usize,
    /// First `g` of a `gg` sequence was pressed
    pub pending_g: bool,
    pub keymap: Keymap,
    pub clipboard: Box<dyn ClipboardProvider>,
}

impl App {
    /// An app over a fresh one-sheet workbook with a process-local clipboard.
    pub fn new() -> Self {
        Self::with_document(Document::new(), Box::new(MemoryClipboard::new()))
    }

    fn with_document(mut doc: Document, clipboard: Box<dyn ClipboardProvider>) -> Self {
        if doc.sheet_count() == 0 {
            doc.create_sheet();
            doc.modified = false;
        }
        doc.focus_cell(CellRef::new(0, 0));
        App {
            doc,
            cursor_col: 0,
            cursor_row: 0,
            viewport_col: 0,
            viewport_row: 0,
            visible_cols: 10,
            visible_rows: 20,
            max_cols: MAX_COLS,
            max_rows: MAX_ROWS,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
            col_width: 12,
            column_widths: HashMap::new(),
            move_source: None,
            help_modal: false,
            help_scroll: 0,
            pending_g: false,
            keymap: Keymap::Vim,
            clipboard,
        }
    }

    /// Create app and load the workbook if `path` exists.
    pub fn with_file(path: Option<PathBuf>, keymap: Keymap) -> Result<Self> {
        let doc = Document::with_file(path)?;
        let mut app = Self::with_document(doc, Box::new(SystemClipboard::new()));
        app.keymap = keymap;
        if let Some(path) = &app.doc.file_path {
            app.status_message = format!("Opened {}", path.display());
        }
        Ok(app)
    }

    pub fn current_cell_ref(&self) -> CellRef {
        CellRef::new(self.cursor_col, self.cursor_row)
    }

    /// Move the cursor to `cell_ref` and focus it in the document.
    pub fn set_cursor(&mut self, cell_ref: CellRef) {
        self.cursor_col = cell_ref.col.min(self.max_cols.saturating_sub(1));
        self.cursor_row = cell_ref.row.min(self.max_rows.saturating_sub(1));
        self.update_viewport();
        self.doc.focus_cell(self.current_cell_ref());
    }

    /// Move cursor by delta, clamping to the grid.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let col = (self.cursor_col as i64 + dx as i64).clamp(0, self.max_cols as i64 - 1);
        let row = (self.cursor_row as i64 + dy as i64).clamp(0, self.max_rows as i64 - 1);
        self.set_cursor(CellRef::new(col as usize, row as usize));
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        } else if self.cursor_col >= self.viewport_col + self.visible_cols {
            self.viewport_col = self.cursor_col + 1 - self.visible_cols;
        }

        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + self.visible_rows {
            self.viewport_row = self.cursor_row + 1 - self.visible_rows;
        }
    }

    pub fn goto_first(&mut self) {
        self.set_cursor(CellRef::new(0, 0));
    }

    /// Go to the last row holding a record on the active sheet.
    pub fn goto_last(&mut self) {
        let last_row = self
            .doc
            .active_store()
            .and_then(|store| store.keys().map(|r| r.row).max())
            .unwrap_or(0);
        self.set_cursor(CellRef::new(self.cursor_col, last_row));
    }

    pub fn enter_edit_mode(&mut self) {
        self.edit_buffer = self.doc.get_or_default(&self.current_cell_ref()).content;
        self.edit_cursor = self.edit_buffer.len();
        self.mode = Mode::Edit;
    }

    /// Commit the edit buffer. Rejected input keeps the app in Edit mode so
    /// the text can be fixed.
    pub fn commit_edit(&mut self) {
        match self.doc.set_active_content(&self.edit_buffer) {
            Ok(()) => {
                self.mode = Mode::Normal;
                self.edit_buffer.clear();
                self.edit_cursor = 0;
                self.status_message.clear();
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn enter_command_mode(&mut self, prefill: &str) {
        self.mode = Mode::Command;
        self.command_buffer = prefill.to_string();
        self.command_cursor = self.command_buffer.len();
    }

    /// Leave Edit/Command mode, or drop a pending move in Normal mode.
    pub fn cancel(&mut self) {
        match self.mode {
            Mode::Edit => {
                self.edit_buffer.clear();
                self.edit_cursor = 0;
            }
            Mode::Command => {
                self.command_buffer.clear();
                self.command_cursor = 0;
            }
            Mode::Normal => {
                if self.move_source.take().is_some() {
                    self.status_message = "Move cancelled".to_string();
                }
            }
        }
        self.mode = Mode::Normal;
    }

    /// Clear the focused cell's content, if it has a record.
    pub fn clear_current_cell(&mut self) {
        let cell_ref = self.current_cell_ref();
        let has_record = self
            .doc
            .active_store()
            .is_some_and(|store| store.contains(&cell_ref));
        if has_record && let Err(e) = self.doc.set_content(cell_ref, "") {
            self.status_message = format!("Error: {}", e);
        }
    }

    /// Execute the command buffer.
    ///
    /// Returns `true` if the application should quit.
    pub fn execute_command(&mut self) -> bool {
        let line = std::mem::take(&mut self.command_buffer);
        self.command_cursor = 0;
        self.mode = Mode::Normal;
        if line.trim().is_empty() {
            return false;
        }
        match command::parse(&line) {
            Ok(cmd) => self.run(cmd),
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                false
            }
        }
    }

    /// Run a command and report the outcome in the status bar.
    ///
    /// Returns `true` if the application should quit.
    pub fn run(&mut self, cmd: Command) -> bool {
        let sheet_before = self.doc.active_index();
        let replaces_workbook = matches!(cmd, Command::Import(_));
        let result = command::execute(&mut self.doc, self.clipboard.as_mut(), cmd);
        if replaces_workbook || self.doc.active_index() != sheet_before {
            self.move_source = None;
        }
        // goto/import move the document focus
        if let Some(focus) = self.doc.active_cell()
            && focus != self.current_cell_ref()
        {
            self.set_cursor(focus);
        }
        match result {
            Ok(Outcome::Message(message)) => self.status_message = message,
            Ok(Outcome::Quit) => return true,
            Ok(Outcome::ColumnWidth(width)) => {
                self.set_column_width(width);
                self.status_message = format!(
                    "Column {} width set to {}",
                    CellRef::col_to_letters(self.cursor_col),
                    self.get_column_width(self.cursor_col)
                );
            }
            Ok(Outcome::Help) => self.open_help(),
            Err(e) => self.status_message = format!("Error: {}", e),
        }
        false
    }

    pub fn format(&mut self, change: FormatChange) {
        self.run(Command::Format(change));
    }

    pub fn cycle_align(&mut self) {
        let current = self.doc.get_or_default(&self.current_cell_ref()).text_align;
        let next = match current {
            TextAlign::Start => TextAlign::Center,
            TextAlign::Center => TextAlign::End,
            TextAlign::End => TextAlign::Start,
        };
        self.format(FormatChange::Align(next));
    }

    pub fn cycle_font(&mut self) {
        let current = self.doc.get_or_default(&self.current_cell_ref()).font_family;
        let index = FontFamily::ALL
            .iter()
            .position(|f| *f == current)
            .unwrap_or(0);
        let next = FontFamily::ALL[(index + 1) % FontFamily::ALL.len()];
        self.format(FormatChange::FontFamily(next));
    }

    /// Step the font size through the toolbar presets.
    pub fn step_font_size(&mut self, up: bool) {
        let current = self.doc.get_or_default(&self.current_cell_ref()).font_size.px();
        let next = if up {
            FontSize::PRESETS.iter().copied().find(|px| *px > current)
        } else {
            FontSize::PRESETS.iter().copied().rev().find(|px| *px < current)
        };
        match next.and_then(FontSize::new) {
            Some(size) => self.format(FormatChange::FontSize(size)),
            None => {
                self.status_message = format!("Font size already at {}px", current);
            }
        }
    }

    pub fn next_sheet(&mut self, forward: bool) {
        let result = if forward {
            self.doc.select_next_sheet()
        } else {
            self.doc.select_previous_sheet()
        };
        match result {
            Ok(index) => {
                // a pending move never crosses sheets
                self.move_source = None;
                self.status_message =
                    format!("Sheet {}: {}", index + 1, self.doc.sheets()[index].name)
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    /// Pick up the focused cell, or drop the picked-up content on it.
    pub fn move_content(&mut self) {
        let here = self.current_cell_ref();
        match self.move_source.take() {
            Some(source) => self.drop_content(source, here),
            None => {
                self.move_source = Some(here);
                self.status_message = format!("Moving {}: pick a target and press m", here);
            }
        }
    }

    /// Copy `source`'s content onto `target`.
    pub fn drop_content(&mut self, source: CellRef, target: CellRef) {
        match self.doc.move_content(source, target) {
            Ok(()) if source == target => self.status_message.clear(),
            Ok(()) => {
                self.status_message = format!("Moved {} to {}", source, target);
                self.set_cursor(target);
            }
            Err(e) => self.status_message = format!("Error: {}", e),
        }
    }

    pub fn get_column_width(&self, col: usize) -> usize {
        *self.column_widths.get(&col).unwrap_or(&self.col_width)
    }

    /// Set width for current column
    pub fn set_column_width(&mut self, width: usize) {
        let width = width.clamp(MIN_COL_WIDTH, MAX_COL_WIDTH);
        self.column_widths.insert(self.cursor_col, width);
    }

    pub fn increase_column_width(&mut self) {
        let current = self.get_column_width(self.cursor_col);
        self.set_column_width(current + 2);
    }

    pub fn decrease_column_width(&mut self) {
        let current = self.get_column_width(self.cursor_col);
        self.set_column_width(current.saturating_sub(2));
    }

    pub fn open_help(&mut self) {
        self.help_modal = true;
        self.help_scroll = 0;
    }

    pub fn close_help_modal(&mut self) {
        self.help_modal = false;
    }

    pub fn scroll_help_by(&mut self, delta: i32) {
        self.help_scroll = if delta < 0 {
            self.help_scroll.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            self.help_scroll.saturating_add(delta as usize)
        };
    }

    pub fn scroll_help_to_top(&mut self) {
        self.help_scroll = 0;
    }

    /// The renderer clamps this to the last page.
    pub fn scroll_help_to_end(&mut self) {
        self.help_scroll = usize::MAX / 2;
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn type_into(app: &mut App, text: &str) {
        app.enter_edit_mode();
        app.edit_buffer = text.to_string();
        app.commit_edit();
    }

    #[test]
    fn new_app_has_one_unmodified_sheet_focused_on_a1() {
        let app = App::new();
        assert_eq!(app.doc.sheet_count(), 1);
        assert!(!app.doc.modified);
        assert_eq!(app.doc.active_cell(), Some(r("A1")));
    }

    #[test]
    fn cursor_moves_focus_and_clamps_to_grid() {
        let mut app = App::new();
        app.move_cursor(2, 3);
        assert_eq!(app.doc.active_cell(), Some(r("C4")));
        app.move_cursor(-10, 500);
        assert_eq!(app.doc.active_cell(), Some(r("A100")));
        app.move_cursor(100, 0);
        assert_eq!(app.current_cell_ref(), r("Z100"));
    }

    #[test]
    fn commit_edit_rejects_mixed_text_and_stays_in_edit_mode() {
        let mut app = App::new();
        type_into(&mut app, "hello world");
        assert_eq!(app.mode, Mode::Edit);
        assert!(app.status_message.starts_with("Error"));
        assert_eq!(app.doc.get_or_default(&r("A1")).content, "");

        app.edit_buffer = "42".to_string();
        app.commit_edit();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.doc.get_or_default(&r("A1")).content, "42");
    }

    #[test]
    fn execute_command_goto_moves_cursor() {
        let mut app = App::new();
        app.enter_command_mode("goto C20");
        assert!(!app.execute_command());
        assert_eq!(app.current_cell_ref(), r("C20"));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn execute_command_quit_respects_unsaved_changes() {
        let mut app = App::new();
        type_into(&mut app, "1");
        app.enter_command_mode("q");
        assert!(!app.execute_command());
        assert!(app.status_message.contains("Unsaved changes"));
        app.enter_command_mode("q!");
        assert!(app.execute_command());
    }

    #[test]
    fn move_content_picks_up_and_drops() {
        let mut app = App::new();
        type_into(&mut app, "abc");
        app.move_content();
        assert_eq!(app.move_source, Some(r("A1")));
        app.move_cursor(1, 1);
        app.move_content();
        assert_eq!(app.move_source, None);
        assert_eq!(app.doc.get_or_default(&r("B2")).content, "abc");
        assert_eq!(app.doc.get_or_default(&r("A1")).content, "abc");
    }

    #[test]
    fn switching_sheets_drops_pending_move() {
        let mut app = App::new();
        type_into(&mut app, "src");
        app.move_content();
        app.run(Command::NewSheet);
        assert_eq!(app.move_source, None);

        // on Sheet 2, `m` starts a new pick-up instead of dropping Sheet 1's A1
        type_into(&mut app, "other");
        app.move_cursor(1, 0);
        app.move_content();
        assert_eq!(app.move_source, Some(r("B1")));
        assert_eq!(app.doc.get_or_default(&r("B1")).content, "");

        app.next_sheet(true);
        assert_eq!(app.doc.active_index(), Some(0));
        assert_eq!(app.move_source, None);
    }

    #[test]
    fn selecting_same_sheet_keeps_pending_move() {
        let mut app = App::new();
        type_into(&mut app, "x");
        app.move_content();
        app.run(Command::Sheet(1));
        assert_eq!(app.move_source, Some(r("A1")));
    }

    #[test]
    fn cancel_drops_pending_move() {
        let mut app = App::new();
        app.move_content();
        app.cancel();
        assert_eq!(app.move_source, None);
        assert_eq!(app.status_message, "Move cancelled");
    }

    #[test]
    fn font_size_steps_through_presets() {
        let mut app = App::new();
        app.step_font_size(true);
        assert_eq!(app.doc.get_or_default(&r("A1")).font_size.px(), 16);
        app.step_font_size(true);
        app.step_font_size(true);
        app.step_font_size(true);
        assert_eq!(app.doc.get_or_default(&r("A1")).font_size.px(), 20);
        assert!(app.status_message.contains("already at 20px"));
        app.step_font_size(false);
        assert_eq!(app.doc.get_or_default(&r("A1")).font_size.px(), 18);
    }

    #[test]
    fn cycle_align_and_font_wrap_around() {
        let mut app = App::new();
        for _ in 0..3 {
            app.cycle_align();
        }
        assert_eq!(app.doc.get_or_default(&r("A1")).text_align, TextAlign::Start);
        app.cycle_font();
        assert_eq!(
            app.doc.get_or_default(&r("A1")).font_family,
            FontFamily::ALL[1]
        );
    }

    #[test]
    fn column_width_is_clamped() {
        let mut app = App::new();
        app.set_column_width(1);
        assert_eq!(app.get_column_width(0), MIN_COL_WIDTH);
        app.set_column_width(500);
        assert_eq!(app.get_column_width(0), MAX_COL_WIDTH);
        assert_eq!(app.get_column_width(1), app.col_width);
    }

    #[test]
    fn clear_current_cell_keeps_formatting() {
        let mut app = App::new();
        type_into(&mut app, "9");
        app.format(FormatChange::ToggleBold);
        app.clear_current_cell();
        let cell = app.doc.get_or_default(&r("A1"));
        assert_eq!(cell.content, "");
        assert!(cell.is_bold);
    }

    #[test]
    fn goto_last_finds_lowest_record() {
        let mut app = App::new();
        app.set_cursor(r("B40"));
        type_into(&mut app, "x");
        app.goto_first();
        app.goto_last();
        assert_eq!(app.current_cell_ref(), r("A40"));
    }
}

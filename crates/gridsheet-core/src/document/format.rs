//! Cell formatting changes.

use super::Document;
use gridsheet_engine::engine::{Cell, CellRef, CellStore, FontFamily, FontSize, Rgb, TextAlign};

/// A change to exactly one formatting field of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatChange {
    FontFamily(FontFamily),
    FontSize(FontSize),
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    TextColor(Rgb),
    BackgroundColor(Rgb),
    Align(TextAlign),
}

impl FormatChange {
    /// Apply to a record. Setters are idempotent, toggles are involutions.
    pub fn apply_to(&self, cell: &mut Cell) {
        match *self {
            FormatChange::FontFamily(family) => cell.font_family = family,
            FormatChange::FontSize(size) => cell.font_size = size,
            FormatChange::ToggleBold => cell.is_bold = !cell.is_bold,
            FormatChange::ToggleItalic => cell.is_italic = !cell.is_italic,
            FormatChange::ToggleUnderline => cell.is_underlined = !cell.is_underlined,
            FormatChange::TextColor(color) => cell.color = color,
            FormatChange::BackgroundColor(color) => cell.background_color = color,
            FormatChange::Align(align) => cell.text_align = align,
        }
    }
}

/// Return a copy of `store` with `change` applied to `address`.
///
/// `None` means a precondition failed (no store or no address) and nothing
/// was changed. The addressed record is created with defaults if unset.
pub fn apply_format(
    store: Option<&CellStore>,
    address: Option<&CellRef>,
    change: FormatChange,
) -> Option<CellStore> {
    let (store, address) = (store?, address?);
    let mut next = store.clone();
    change.apply_to(next.entry(*address));
    Some(next)
}

impl Document {
    /// Apply a formatting change to the active cell of the active sheet.
    ///
    /// Returns `false` without touching anything when no sheet or no cell is
    /// active.
    pub fn format_active(&mut self, change: FormatChange) -> bool {
        let address = self.active_cell;
        let Some(next) = apply_format(self.active_store(), address.as_ref(), change) else {
            return false;
        };
        log::debug!("format {:?} on {:?}", change, address);
        self.replace_active_store(next).is_ok()
    }
}

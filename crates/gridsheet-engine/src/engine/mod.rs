//! Spreadsheet cell model.
//!
//! - [`CellRef`] - Cell reference parsing (A1 notation ↔ row/col indices)
//! - [`Cell`], [`CellStore`] - Cell records and their per-sheet storage
//! - [`FontFamily`], [`FontSize`], [`TextAlign`], [`Rgb`] - Formatting attributes
//! - [`is_valid_input`], [`parse_number`] - Content validation and numeric reads

mod cell;
mod cell_ref;
mod store;
mod style;

pub use cell::{Cell, is_valid_input, parse_number};
pub use cell_ref::{CellRef, MAX_COLS, MAX_ROWS};
pub use store::CellStore;
pub use style::{FontFamily, FontSize, Rgb, TextAlign};

//! Document state and logic (UI-agnostic).

mod eval;
mod format;
mod io;
mod ops;
mod state;

pub use eval::{Function, FunctionOutcome};
pub use format::{FormatChange, apply_format};
pub use state::{Document, Sheet, ToolbarState};

//! Help text content for the help modal

use super::keymap::{Action, Binding, CustomKeymap, Keymap};
use gridsheet_core::Function;

fn lines(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

pub fn get_about_help() -> Vec<String> {
    lines(&[
        "About Gridsheet",
        "",
        "Workbook:",
        "  Sheets of 26 columns (A-Z) by 100 rows.",
        "  A cell holds a number or a run of letters; anything else is rejected.",
        "  Workbooks are saved as JSON: one object per sheet, cells keyed A1..Z100.",
        "",
        "Mouse:",
        "  Click a cell to focus it; drag to another cell to copy its content there.",
    ])
}

/// Get keybinding help text for the current keymap
pub fn get_help_text(keymap: &Keymap) -> Vec<String> {
    match keymap {
        Keymap::Vim => lines(&[
            "Keys",
            "",
            "Navigation:",
            "  h/j/k/l      Move left/down/up/right",
            "  PageUp/Down  Scroll by page",
            "  Home/End     First/last column",
            "  gg / G       First cell / last row with data",
            "  g            Open goto prompt",
            "",
            "Editing:",
            "  i / Enter    Edit cell",
            "  x / Delete   Clear cell",
            "  y / d / p    Copy / cut / paste",
            "  m            Pick up cell, m again to drop",
            "  Esc          Cancel",
            "",
            "Format:",
            "  B / I / U    Bold / italic / underline",
            "  =            Cycle alignment",
            "  F            Cycle font family",
            "  Z / z        Font size up / down",
            "",
            "Sheets:",
            "  ] / [        Next / previous sheet",
            "  N            New sheet",
            "",
            "Other:",
            "  :            Command mode",
            "  f            Function prompt",
            "  +/-          Column width",
            "  ?            This help",
        ]),
        Keymap::Emacs => lines(&[
            "Keys",
            "",
            "Navigation:",
            "  C-n/C-p      Move down/up",
            "  C-f/C-b      Move right/left",
            "  C-v/M-v      Page down/up",
            "  C-a/C-e      First/last column",
            "  M-< / M->    First cell / last row",
            "  M-g          Open goto prompt",
            "",
            "Editing:",
            "  Enter        Edit cell",
            "  C-d/Delete   Clear cell",
            "  M-w/C-w/C-y  Copy / cut / paste",
            "  C-SPC        Pick up cell, again to drop",
            "  C-g / Esc    Cancel",
            "",
            "Format:",
            "  M-b/M-i/M-u  Bold / italic / underline",
            "  M-a          Cycle alignment",
            "  M-o          Cycle font family",
            "  M-= / M--    Font size up / down",
            "",
            "Sheets:",
            "  M-n / M-p    Next / previous sheet",
            "  C-t          New sheet",
            "",
            "Other:",
            "  M-x          Command mode",
            "  M-f          Function prompt",
            "  C-s          Save",
            "  C-h          This help",
        ]),
        Keymap::Custom(custom) => custom_help_text(custom),
    }
}

pub fn get_functions_help() -> Vec<String> {
    let mut out = lines(&[
        "Functions",
        "",
        "Aggregates (every populated cell of the sheet):",
        "  SUM MAX MIN COUNT           Non-numeric cells are ignored",
        "  AVERAGE                     SUM divided by every populated cell",
        "",
        "Text (focused cell):",
        "  TRIM UPPER LOWER",
        "",
        "Sheet:",
        "  REMOVE_DUPLICATES           Keep the first cell of each content",
        "  FIND_AND_REPLACE <s> [r]    Literal, case-sensitive",
        "",
    ]);
    out.push(format!("  Available: {}", Function::NAMES.join(", ")));
    out.push(String::new());
    out.push("Press Esc or q to close".to_string());
    out
}

fn custom_help_text(custom: &CustomKeymap) -> Vec<String> {
    let mut out: Vec<String> = vec!["Keys".to_string(), String::new()];
    if let Some(desc) = custom.description.as_ref() {
        out.push(format!("  {}", desc));
        out.push(String::new());
    }
    let modes = [
        ("Normal:", &custom.bindings.normal),
        ("Edit:", &custom.bindings.edit),
        ("Command:", &custom.bindings.command),
    ];
    for (i, (title, bindings)) in modes.into_iter().enumerate() {
        if i > 0 {
            out.push(String::new());
        }
        out.push(title.to_string());
        append_bindings(&mut out, bindings);
    }
    out
}

fn append_bindings(out: &mut Vec<String>, bindings: &[Binding]) {
    if bindings.is_empty() {
        out.push("  (no bindings)".to_string());
        return;
    }
    for binding in bindings {
        out.push(format!(
            "  {:<12} {}",
            binding.combo.display(),
            action_label(binding.action)
        ));
    }
}

fn action_label(action: Action) -> &'static str {
    match action {
        Action::Cancel => "Cancel",
        Action::EnterEdit => "Edit cell",
        Action::CommitEdit => "Commit edit",
        Action::EnterCommand => "Command mode",
        Action::ExecuteCommand => "Execute command",
        Action::Copy => "Copy",
        Action::Cut => "Cut",
        Action::Paste => "Paste",
        Action::ClearCell => "Clear cell",
        Action::MoveContent => "Pick up / drop cell",
        Action::Move(-1, 0) => "Move left",
        Action::Move(1, 0) => "Move right",
        Action::Move(0, -1) => "Move up",
        Action::Move(0, 1) => "Move down",
        Action::Move(_, _) => "Move",
        Action::Page(-1) => "Page up",
        Action::Page(1) => "Page down",
        Action::Page(_) => "Page",
        Action::HomeCol => "First column",
        Action::EndCol => "Last column",
        Action::GotoFirst => "Go to A1",
        Action::GotoLast => "Go to last row",
        Action::OpenGotoPrompt => "Goto prompt",
        Action::ToggleBold => "Toggle bold",
        Action::ToggleItalic => "Toggle italic",
        Action::ToggleUnderline => "Toggle underline",
        Action::CycleAlign => "Cycle alignment",
        Action::CycleFont => "Cycle font family",
        Action::IncFontSize => "Font size up",
        Action::DecFontSize => "Font size down",
        Action::NextSheet => "Next sheet",
        Action::PrevSheet => "Previous sheet",
        Action::NewSheet => "New sheet",
        Action::OpenFunctionPrompt => "Function prompt",
        Action::OpenHelp => "Help",
        Action::IncColWidth => "Increase column width",
        Action::DecColWidth => "Decrease column width",
        Action::Save => "Save",
    }
}

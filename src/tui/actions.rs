use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crate::command::Command;
use gridsheet_core::FormatChange;

use super::app::{App, Mode};
use super::keymap::Action;

fn prev_boundary(buffer: &str, cursor: usize) -> usize {
    buffer[..cursor]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

fn next_boundary(buffer: &str, cursor: usize) -> usize {
    buffer[cursor..]
        .chars()
        .next()
        .map_or(cursor, |c| cursor + c.len_utf8())
}

/// Line editing on a prompt buffer. `cursor` is a byte offset that always
/// sits on a char boundary.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Left => *cursor = prev_boundary(buffer, *cursor),
        KeyCode::Right => *cursor = next_boundary(buffer, *cursor),
        KeyCode::Home => *cursor = 0,
        KeyCode::Char('a') if ctrl => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Char('e') if ctrl => *cursor = buffer.len(),
        KeyCode::Backspace => {
            let start = prev_boundary(buffer, *cursor);
            buffer.drain(start..*cursor);
            *cursor = start;
        }
        KeyCode::Char('h') if ctrl => {
            let start = prev_boundary(buffer, *cursor);
            buffer.drain(start..*cursor);
            *cursor = start;
        }
        KeyCode::Delete => {
            let end = next_boundary(buffer, *cursor);
            buffer.drain(*cursor..end);
        }
        KeyCode::Char('k') if ctrl => buffer.truncate(*cursor),
        KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
            buffer.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => {}
    }
}

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action(app: &mut App, action: Action) -> ApplyResult {
    log::trace!("action {:?} in {:?}", action, app.mode);
    match action {
        Action::Cancel => app.cancel(),
        Action::EnterEdit => app.enter_edit_mode(),
        Action::CommitEdit => app.commit_edit(),
        Action::EnterCommand => app.enter_command_mode(""),
        Action::ExecuteCommand => {
            if app.execute_command() {
                return ApplyResult::Quit;
            }
        }

        Action::Copy => {
            app.run(Command::Copy);
        }
        Action::Cut => {
            app.run(Command::Cut);
        }
        Action::Paste => {
            app.run(Command::Paste);
        }
        Action::ClearCell => app.clear_current_cell(),
        Action::MoveContent => app.move_content(),

        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::Page(dir) => {
            let delta = app.visible_rows as i32 * dir;
            app.move_cursor(0, delta);
        }
        Action::HomeCol => app.move_cursor(-(app.cursor_col as i32), 0),
        Action::EndCol => app.move_cursor(app.max_cols as i32, 0),
        Action::GotoFirst => app.goto_first(),
        Action::GotoLast => app.goto_last(),
        Action::OpenGotoPrompt => app.enter_command_mode("goto "),

        Action::ToggleBold => app.format(FormatChange::ToggleBold),
        Action::ToggleItalic => app.format(FormatChange::ToggleItalic),
        Action::ToggleUnderline => app.format(FormatChange::ToggleUnderline),
        Action::CycleAlign => app.cycle_align(),
        Action::CycleFont => app.cycle_font(),
        Action::IncFontSize => app.step_font_size(true),
        Action::DecFontSize => app.step_font_size(false),

        Action::NextSheet => app.next_sheet(true),
        Action::PrevSheet => app.next_sheet(false),
        Action::NewSheet => {
            app.run(Command::NewSheet);
        }

        Action::OpenFunctionPrompt => app.enter_command_mode("fn "),
        Action::OpenHelp => app.open_help(),
        Action::IncColWidth => app.increase_column_width(),
        Action::DecColWidth => app.decrease_column_width(),
        Action::Save => {
            app.run(Command::Write(None));
        }
    }
    ApplyResult::Continue
}

pub fn handle_text(app: &mut App, key: KeyEvent) {
    match app.mode {
        Mode::Edit => handle_text_input(&mut app.edit_buffer, &mut app.edit_cursor, key),
        Mode::Command => handle_text_input(&mut app.command_buffer, &mut app.command_cursor, key),
        Mode::Normal => {}
    }
}

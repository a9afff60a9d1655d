use crate::tui::app::Mode;
use crate::tui::keymap::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Keys every mode shares between the built-in keymaps.
fn translate_prompt(mode: Mode, key: KeyEvent) -> Option<Action> {
    match (mode, key.code) {
        (Mode::Edit | Mode::Command, KeyCode::Esc) => Some(Action::Cancel),
        (Mode::Edit, KeyCode::Enter) => Some(Action::CommitEdit),
        (Mode::Command, KeyCode::Enter) => Some(Action::ExecuteCommand),
        _ => None,
    }
}

fn translate_arrows(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Up => Some(Action::Move(0, -1)),
        KeyCode::Down => Some(Action::Move(0, 1)),
        KeyCode::Left => Some(Action::Move(-1, 0)),
        KeyCode::Right => Some(Action::Move(1, 0)),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Action::Move(-1, 0)),
        KeyCode::Tab => Some(Action::Move(1, 0)),
        KeyCode::BackTab => Some(Action::Move(-1, 0)),
        KeyCode::PageUp => Some(Action::Page(-1)),
        KeyCode::PageDown => Some(Action::Page(1)),
        KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::GotoFirst),
        KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::GotoLast),
        KeyCode::Home => Some(Action::HomeCol),
        KeyCode::End => Some(Action::EndCol),
        KeyCode::Delete => Some(Action::ClearCell),
        _ => None,
    }
}

pub(crate) fn translate_vim(mode: Mode, key: KeyEvent) -> Option<Action> {
    if mode != Mode::Normal {
        return translate_prompt(mode, key);
    }
    if let Some(action) = translate_arrows(key) {
        return Some(action);
    }
    match key.code {
        KeyCode::Char('k') => Some(Action::Move(0, -1)),
        KeyCode::Char('j') => Some(Action::Move(0, 1)),
        KeyCode::Char('h') => Some(Action::Move(-1, 0)),
        KeyCode::Char('l') => Some(Action::Move(1, 0)),
        KeyCode::Char('G') => Some(Action::GotoLast),
        // 'g' is handled in input.rs for the gg sequence

        KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('a') => Some(Action::EnterEdit),
        KeyCode::Char(':') => Some(Action::EnterCommand),
        KeyCode::Char('f') => Some(Action::OpenFunctionPrompt),
        KeyCode::Char('?') => Some(Action::OpenHelp),
        KeyCode::Esc => Some(Action::Cancel),

        KeyCode::Char('y') => Some(Action::Copy),
        KeyCode::Char('d') => Some(Action::Cut),
        KeyCode::Char('p') => Some(Action::Paste),
        KeyCode::Char('x') => Some(Action::ClearCell),
        KeyCode::Char('m') => Some(Action::MoveContent),

        KeyCode::Char('B') => Some(Action::ToggleBold),
        KeyCode::Char('I') => Some(Action::ToggleItalic),
        KeyCode::Char('U') => Some(Action::ToggleUnderline),
        KeyCode::Char('=') => Some(Action::CycleAlign),
        KeyCode::Char('F') => Some(Action::CycleFont),
        KeyCode::Char('Z') => Some(Action::IncFontSize),
        KeyCode::Char('z') => Some(Action::DecFontSize),

        KeyCode::Char(']') => Some(Action::NextSheet),
        KeyCode::Char('[') => Some(Action::PrevSheet),
        KeyCode::Char('N') => Some(Action::NewSheet),

        KeyCode::Char('+') | KeyCode::Char('>') => Some(Action::IncColWidth),
        KeyCode::Char('-') | KeyCode::Char('<') => Some(Action::DecColWidth),
        _ => None,
    }
}

pub(crate) fn translate_emacs(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    if mode != Mode::Normal {
        if ctrl && key.code == KeyCode::Char('g') {
            return Some(Action::Cancel);
        }
        return translate_prompt(mode, key);
    }
    if let Some(action) = translate_arrows(key) {
        return Some(action);
    }

    match key.code {
        KeyCode::Char('g') if ctrl => Some(Action::Cancel),
        KeyCode::Esc => Some(Action::Cancel),

        // Movement
        KeyCode::Char('p') if ctrl => Some(Action::Move(0, -1)),
        KeyCode::Char('n') if ctrl => Some(Action::Move(0, 1)),
        KeyCode::Char('b') if ctrl => Some(Action::Move(-1, 0)),
        KeyCode::Char('f') if ctrl => Some(Action::Move(1, 0)),
        KeyCode::Char('v') if ctrl => Some(Action::Page(1)),
        KeyCode::Char('v') if alt => Some(Action::Page(-1)),
        KeyCode::Char('a') if ctrl => Some(Action::HomeCol),
        KeyCode::Char('e') if ctrl => Some(Action::EndCol),
        KeyCode::Char('<') if alt => Some(Action::GotoFirst),
        KeyCode::Char('>') if alt => Some(Action::GotoLast),
        KeyCode::Char('g') if alt => Some(Action::OpenGotoPrompt),

        KeyCode::Enter => Some(Action::EnterEdit),
        KeyCode::Char('x') if alt => Some(Action::EnterCommand),
        KeyCode::Char('f') if alt => Some(Action::OpenFunctionPrompt),
        KeyCode::Char('h') if ctrl => Some(Action::OpenHelp),
        KeyCode::Char('s') if ctrl => Some(Action::Save),

        // Kill ring
        KeyCode::Char('w') if alt => Some(Action::Copy),
        KeyCode::Char('w') if ctrl => Some(Action::Cut),
        KeyCode::Char('y') if ctrl => Some(Action::Paste),
        KeyCode::Char('d') if ctrl => Some(Action::ClearCell),
        KeyCode::Char(' ') if ctrl => Some(Action::MoveContent),

        // Formatting
        KeyCode::Char('b') if alt => Some(Action::ToggleBold),
        KeyCode::Char('i') if alt => Some(Action::ToggleItalic),
        KeyCode::Char('u') if alt => Some(Action::ToggleUnderline),
        KeyCode::Char('a') if alt => Some(Action::CycleAlign),
        KeyCode::Char('o') if alt => Some(Action::CycleFont),
        KeyCode::Char('=') if alt => Some(Action::IncFontSize),
        KeyCode::Char('-') if alt => Some(Action::DecFontSize),

        // Sheets
        KeyCode::Char('n') if alt => Some(Action::NextSheet),
        KeyCode::Char('p') if alt => Some(Action::PrevSheet),
        KeyCode::Char('t') if ctrl => Some(Action::NewSheet),

        KeyCode::Char('+') if ctrl => Some(Action::IncColWidth),
        KeyCode::Char('-') if ctrl => Some(Action::DecColWidth),

        // strict: bare letters do nothing
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn vim_letters_format_in_normal_mode() {
        let bold = key(KeyCode::Char('B'), KeyModifiers::SHIFT);
        assert_eq!(translate_vim(Mode::Normal, bold), Some(Action::ToggleBold));
        assert_eq!(translate_vim(Mode::Edit, bold), None);
    }

    #[test]
    fn vim_prompt_keys() {
        let enter = key(KeyCode::Enter, KeyModifiers::empty());
        assert_eq!(translate_vim(Mode::Edit, enter), Some(Action::CommitEdit));
        assert_eq!(translate_vim(Mode::Command, enter), Some(Action::ExecuteCommand));
        assert_eq!(translate_vim(Mode::Normal, enter), Some(Action::EnterEdit));
    }

    #[test]
    fn emacs_is_strict_about_bare_letters() {
        let j = key(KeyCode::Char('j'), KeyModifiers::empty());
        assert_eq!(translate_emacs(Mode::Normal, j), None);
        let meta_b = key(KeyCode::Char('b'), KeyModifiers::ALT);
        assert_eq!(translate_emacs(Mode::Normal, meta_b), Some(Action::ToggleBold));
        let ctrl_b = key(KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert_eq!(translate_emacs(Mode::Normal, ctrl_b), Some(Action::Move(-1, 0)));
    }

    #[test]
    fn emacs_ctrl_g_cancels_prompts() {
        let ctrl_g = key(KeyCode::Char('g'), KeyModifiers::CONTROL);
        assert_eq!(translate_emacs(Mode::Command, ctrl_g), Some(Action::Cancel));
        assert_eq!(translate_emacs(Mode::Edit, ctrl_g), Some(Action::Cancel));
    }
}

use crate::tui::app::Mode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Available keybinding schemes.
///
/// - [`Vim`](Keymap::Vim): hjkl navigation, `:` commands, single-key formatting
/// - [`Emacs`](Keymap::Emacs): C-n/p/f/b navigation, M-x commands, M-b/i/u formatting
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Keymap {
    Vim,
    Emacs,
    /// Loaded from `keymaps.toml`.
    Custom(CustomKeymap),
}

impl Keymap {
    pub fn name(&self) -> &str {
        match self {
            Keymap::Vim => "vim",
            Keymap::Emacs => "emacs",
            Keymap::Custom(custom) => &custom.name,
        }
    }

    pub fn status_hint(&self) -> String {
        match self {
            Keymap::Vim => {
                "hjkl:move  i:edit  B/I/U:style  f:fn  y/d/p:clip  m:move  ]/[:sheet  ?:help  :q:quit"
                    .to_string()
            }
            Keymap::Emacs => {
                "C-n/p/f/b:move  Enter:edit  M-x:cmd  M-b/i/u:style  M-w/C-w/C-y:clip  C-s:save  C-h:help"
                    .to_string()
            }
            Keymap::Custom(custom) => {
                format!("custom keymap: {}  :help for bindings", custom.name)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomKeymap {
    pub name: String,
    pub description: Option<String>,
    pub bindings: KeymapBindings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeymapBindings {
    pub normal: Vec<Binding>,
    pub edit: Vec<Binding>,
    pub command: Vec<Binding>,
}

impl KeymapBindings {
    fn for_mode(&self, mode: Mode) -> &[Binding] {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Edit => &self.edit,
            Mode::Command => &self.command,
        }
    }

    pub fn len(&self) -> usize {
        self.normal.len() + self.edit.len() + self.command.len()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub combo: KeyCombo,
    pub action: Action,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyCombo {
    /// A combo without modifiers matches regardless of the modifiers held,
    /// so `B` still fires when the terminal reports SHIFT.
    fn matches(&self, key: KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers.is_empty() || key.modifiers.contains(self.modifiers))
    }

    pub fn display(&self) -> String {
        let prefixes = [
            (KeyModifiers::CONTROL, "C-"),
            (KeyModifiers::ALT, "M-"),
            (KeyModifiers::SHIFT, "S-"),
        ];
        let mut out: String = prefixes
            .iter()
            .filter(|(flag, _)| self.modifiers.contains(*flag))
            .map(|(_, prefix)| *prefix)
            .collect();
        match self.code {
            KeyCode::Char(' ') => out.push_str("Space"),
            KeyCode::Char(c) => out.push(c),
            KeyCode::F(n) => out.push_str(&format!("F{}", n)),
            KeyCode::Backspace => out.push_str("Backspace"),
            KeyCode::Enter => out.push_str("Enter"),
            KeyCode::Left => out.push_str("Left"),
            KeyCode::Right => out.push_str("Right"),
            KeyCode::Up => out.push_str("Up"),
            KeyCode::Down => out.push_str("Down"),
            KeyCode::Home => out.push_str("Home"),
            KeyCode::End => out.push_str("End"),
            KeyCode::PageUp => out.push_str("PageUp"),
            KeyCode::PageDown => out.push_str("PageDown"),
            KeyCode::Tab => out.push_str("Tab"),
            KeyCode::Delete => out.push_str("Delete"),
            KeyCode::Esc => out.push_str("Esc"),
            _ => out.push_str("Unknown"),
        }
        out
    }
}

impl CustomKeymap {
    /// Bindings with modifiers win over bare ones for the same key.
    pub(crate) fn translate(&self, mode: Mode, key: KeyEvent) -> Option<Action> {
        let bindings = self.bindings.for_mode(mode);
        let (with_mods, bare): (Vec<&Binding>, Vec<&Binding>) = bindings
            .iter()
            .partition(|binding| !binding.combo.modifiers.is_empty());
        with_mods
            .into_iter()
            .chain(bare)
            .find(|binding| binding.combo.matches(key))
            .map(|binding| binding.action)
    }
}

/// What a key press asks the app to do.
///
/// The keymap turns key events into actions; [`apply_action`] applies them.
///
/// [`apply_action`]: crate::tui::actions::apply_action
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Leave Edit/Command mode, or drop a pending move.
    Cancel,
    EnterEdit,
    CommitEdit,
    EnterCommand,
    ExecuteCommand,

    Copy,
    Cut,
    Paste,
    ClearCell,
    /// Pick up the focused cell's content, or drop it on the focused cell.
    MoveContent,

    /// Move cursor by (dx, dy).
    Move(i32, i32),
    /// Page up (-1) or down (+1).
    Page(i32),
    HomeCol,
    EndCol,
    GotoFirst,
    /// Jump to the last populated row.
    GotoLast,
    OpenGotoPrompt,

    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    CycleAlign,
    CycleFont,
    IncFontSize,
    DecFontSize,

    NextSheet,
    PrevSheet,
    NewSheet,

    OpenFunctionPrompt,
    OpenHelp,
    IncColWidth,
    DecColWidth,
    Save,
}

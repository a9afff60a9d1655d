use super::types::{Action, Binding, CustomKeymap, KeyCombo, Keymap, KeymapBindings};
use crossterm::event::{KeyCode, KeyModifiers};
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const MAX_KEYMAP_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_BINDINGS_PER_MODE: usize = 512;
const MAX_TOTAL_BINDINGS: usize = 1_024;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapsFile {
    meta: Option<KeymapsMeta>,
    keymaps: Option<HashMap<String, KeymapFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapsMeta {
    default: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KeymapFile {
    description: Option<String>,
    normal: Option<HashMap<String, String>>,
    edit: Option<HashMap<String, String>>,
    command: Option<HashMap<String, String>>,
}

/// Action names accepted on the right-hand side of a binding.
const ACTION_NAMES: &[(&str, Action)] = &[
    ("cancel", Action::Cancel),
    ("enter_edit", Action::EnterEdit),
    ("commit_edit", Action::CommitEdit),
    ("enter_command", Action::EnterCommand),
    ("execute_command", Action::ExecuteCommand),
    ("copy", Action::Copy),
    ("cut", Action::Cut),
    ("paste", Action::Paste),
    ("clear_cell", Action::ClearCell),
    ("move_content", Action::MoveContent),
    ("move_left", Action::Move(-1, 0)),
    ("move_right", Action::Move(1, 0)),
    ("move_up", Action::Move(0, -1)),
    ("move_down", Action::Move(0, 1)),
    ("page_up", Action::Page(-1)),
    ("page_down", Action::Page(1)),
    ("home_col", Action::HomeCol),
    ("end_col", Action::EndCol),
    ("goto_first", Action::GotoFirst),
    ("goto_last", Action::GotoLast),
    ("open_goto", Action::OpenGotoPrompt),
    ("toggle_bold", Action::ToggleBold),
    ("toggle_italic", Action::ToggleItalic),
    ("toggle_underline", Action::ToggleUnderline),
    ("cycle_align", Action::CycleAlign),
    ("cycle_font", Action::CycleFont),
    ("inc_font_size", Action::IncFontSize),
    ("dec_font_size", Action::DecFontSize),
    ("next_sheet", Action::NextSheet),
    ("prev_sheet", Action::PrevSheet),
    ("new_sheet", Action::NewSheet),
    ("open_function", Action::OpenFunctionPrompt),
    ("help", Action::OpenHelp),
    ("inc_col_width", Action::IncColWidth),
    ("dec_col_width", Action::DecColWidth),
    ("save", Action::Save),
];

/// Resolve the keymap to use.
///
/// Order: `requested` (from `--keymap`), then `meta.default` from the keymaps
/// file, then built-in vim. Problems never abort startup; they come back as
/// warnings and the built-in vim keymap is used instead.
pub fn load_keymap(
    requested: Option<&str>,
    keymap_file: Option<&PathBuf>,
) -> (Keymap, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = keymap_file.cloned().or_else(user_keymaps_path);
    let config_label = config_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "keymaps.toml".to_string());

    let file = match config_path.as_deref() {
        Some(path) if path.exists() => match read_keymaps_file(path) {
            Ok(file) => Some(file),
            Err(err) => {
                warnings.push(err);
                None
            }
        },
        Some(path) if keymap_file.is_some() => {
            warnings.push(format!("Keymap file not found: {}", path.display()));
            None
        }
        _ => None,
    };

    let requested_name = requested.map(str::trim).filter(|s| !s.is_empty());
    let default_name = file
        .as_ref()
        .and_then(|f| f.meta.as_ref())
        .and_then(|m| m.default.as_deref());
    let target = requested_name.or(default_name).unwrap_or("vim");
    let custom_entry = file
        .as_ref()
        .and_then(|f| f.keymaps.as_ref())
        .and_then(|keymaps| keymaps.get(target));

    match custom_entry {
        Some(entry) => match build_custom_keymap(target, entry) {
            Ok(custom) => {
                log::info!("using custom keymap {:?} from {}", target, config_label);
                return (Keymap::Custom(custom), warnings);
            }
            Err(errs) => warnings.extend(errs),
        },
        None if !is_builtin_keymap(target) => {
            if requested_name.is_some() {
                warnings.push(format!("Keymap '{}' not found in {}", target, config_label));
            } else {
                warnings.push(format!(
                    "Default keymap '{}' not found in {}; falling back to built-in 'vim'",
                    target, config_label
                ));
            }
        }
        None => {}
    }

    if target.eq_ignore_ascii_case("emacs") {
        (Keymap::Emacs, warnings)
    } else {
        if requested_name.is_some() && !target.eq_ignore_ascii_case("vim") {
            warnings.push(format!("Falling back to built-in 'vim' keymap for '{}'", target));
        }
        (Keymap::Vim, warnings)
    }
}

fn read_keymaps_file(path: &Path) -> Result<KeymapsFile, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_KEYMAP_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_KEYMAP_FILE_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    toml::from_str::<KeymapsFile>(&content)
        .map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}

fn user_keymaps_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "gridsheet")?;
    Some(proj.config_dir().join("keymaps.toml"))
}

fn is_builtin_keymap(name: &str) -> bool {
    name.eq_ignore_ascii_case("vim") || name.eq_ignore_ascii_case("emacs")
}

fn build_custom_keymap(name: &str, entry: &KeymapFile) -> Result<CustomKeymap, Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    let bindings = KeymapBindings {
        normal: parse_mode_bindings("normal", entry.normal.as_ref(), &mut errors),
        edit: parse_mode_bindings("edit", entry.edit.as_ref(), &mut errors),
        command: parse_mode_bindings("command", entry.command.as_ref(), &mut errors),
    };
    if bindings.len() > MAX_TOTAL_BINDINGS {
        errors.push(format!(
            "Too many total bindings: {} (max {})",
            bindings.len(),
            MAX_TOTAL_BINDINGS
        ));
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(CustomKeymap {
        name: name.to_string(),
        description: entry.description.clone(),
        bindings,
    })
}

fn parse_mode_bindings(
    mode: &str,
    raw: Option<&HashMap<String, String>>,
    errors: &mut Vec<String>,
) -> Vec<Binding> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.len() > MAX_BINDINGS_PER_MODE {
        errors.push(format!(
            "Too many {} bindings: {} (max {})",
            mode,
            raw.len(),
            MAX_BINDINGS_PER_MODE
        ));
        return Vec::new();
    }

    let mut bindings: Vec<Binding> = Vec::with_capacity(raw.len());
    for (combo_str, action_str) in raw {
        let combo = match parse_key_combo(combo_str) {
            Ok(combo) => combo,
            Err(err) => {
                errors.push(format!(
                    "Invalid key '{}' in {} bindings: {}",
                    combo_str, mode, err
                ));
                continue;
            }
        };
        let Some(action) = action_from_str(action_str) else {
            errors.push(format!(
                "Invalid action '{}' in {} bindings",
                action_str, mode
            ));
            continue;
        };
        if bindings.iter().any(|binding| binding.combo == combo) {
            errors.push(format!(
                "Duplicate key '{}' in {} bindings",
                combo.display(),
                mode
            ));
            continue;
        }
        bindings.push(Binding { combo, action });
    }
    bindings
}

/// Parse `C-s`, `M-S-Tab`, `Enter`, `-` or `C--` style key names.
fn parse_key_combo(input: &str) -> Result<KeyCombo, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }

    let (mod_part, key_part) = if is_single_char(trimmed) {
        ("", trimmed)
    } else if let Some(prefix) = trimmed.strip_suffix("--") {
        if prefix.is_empty() {
            return Err("missing modifier before '-'".to_string());
        }
        (prefix, "-")
    } else {
        trimmed.rsplit_once('-').unwrap_or(("", trimmed))
    };

    let modifiers = if mod_part.is_empty() {
        KeyModifiers::empty()
    } else {
        parse_modifiers(mod_part)?
    };
    Ok(KeyCombo {
        code: parse_key_code(key_part)?,
        modifiers,
    })
}

fn parse_modifiers(input: &str) -> Result<KeyModifiers, String> {
    let mut modifiers = KeyModifiers::empty();
    for part in input.split('-') {
        let raw = part.trim();
        let flag = match raw.to_ascii_lowercase().as_str() {
            "" => return Err("empty modifier segment".to_string()),
            "c" | "ctrl" | "control" => KeyModifiers::CONTROL,
            "m" | "alt" | "meta" => KeyModifiers::ALT,
            "s" | "shift" => KeyModifiers::SHIFT,
            _ => return Err(format!("unknown modifier '{}'", part)),
        };
        if modifiers.contains(flag) {
            return Err(format!("duplicate modifier '{}'", raw));
        }
        modifiers.insert(flag);
    }
    Ok(modifiers)
}

fn parse_key_code(input: &str) -> Result<KeyCode, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("empty key".to_string());
    }
    if is_single_char(trimmed) {
        return trimmed
            .chars()
            .next()
            .map(KeyCode::Char)
            .ok_or_else(|| "empty key".to_string());
    }
    let norm = trimmed.to_ascii_lowercase();
    if let Some(n) = norm.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }
    let code = match norm.as_str() {
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "tab" => KeyCode::Tab,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "space" | "spc" => KeyCode::Char(' '),
        "dash" | "minus" => KeyCode::Char('-'),
        "plus" => KeyCode::Char('+'),
        "equal" => KeyCode::Char('='),
        "greater" => KeyCode::Char('>'),
        "less" => KeyCode::Char('<'),
        "lbracket" | "leftbracket" => KeyCode::Char('['),
        "rbracket" | "rightbracket" => KeyCode::Char(']'),
        "question" => KeyCode::Char('?'),
        "colon" => KeyCode::Char(':'),
        _ => return Err(format!("unknown key '{}'", input)),
    };
    Ok(code)
}

fn is_single_char(input: &str) -> bool {
    let mut chars = input.chars();
    chars.next().is_some() && chars.next().is_none()
}

fn action_from_str(input: &str) -> Option<Action> {
    let wanted = input.trim().to_ascii_lowercase();
    ACTION_NAMES
        .iter()
        .find(|(name, _)| *name == wanted)
        .map(|(_, action)| *action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Mode;
    use crossterm::event::KeyEvent;

    /// Writes a keymaps file under the temp dir and removes it on drop.
    struct TempKeymaps(PathBuf);

    impl TempKeymaps {
        fn new(tag: &str, content: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "gridsheet_keymaps_{}_{}.toml",
                tag,
                std::process::id()
            ));
            std::fs::write(&path, content).expect("write temp keymaps");
            TempKeymaps(path)
        }
    }

    impl Drop for TempKeymaps {
        fn drop(&mut self) {
            let _ = std::fs::remove_file(&self.0);
        }
    }

    #[test]
    fn parse_key_combo_modifiers() {
        let combo = parse_key_combo("C-s").expect("combo");
        assert_eq!(combo.code, KeyCode::Char('s'));
        assert_eq!(combo.modifiers, KeyModifiers::CONTROL);

        let combo = parse_key_combo("meta-shift-Tab").expect("combo");
        assert_eq!(combo.code, KeyCode::Tab);
        assert_eq!(combo.modifiers, KeyModifiers::ALT | KeyModifiers::SHIFT);
    }

    #[test]
    fn parse_key_combo_named_and_function_keys() {
        assert_eq!(parse_key_combo("Enter").unwrap().code, KeyCode::Enter);
        assert_eq!(parse_key_combo("F5").unwrap().code, KeyCode::F(5));
        assert_eq!(parse_key_combo("rbracket").unwrap().code, KeyCode::Char(']'));
        // a lone capital F is the letter, not a function key
        assert_eq!(parse_key_combo("F").unwrap().code, KeyCode::Char('F'));
    }

    #[test]
    fn parse_key_combo_dash_forms() {
        let plain = parse_key_combo("-").expect("combo");
        assert_eq!(plain.code, KeyCode::Char('-'));
        assert!(plain.modifiers.is_empty());

        let ctrl = parse_key_combo("C--").expect("combo");
        assert_eq!(ctrl.code, KeyCode::Char('-'));
        assert_eq!(ctrl.modifiers, KeyModifiers::CONTROL);

        let err = parse_key_combo("--").unwrap_err();
        assert!(err.contains("missing modifier"));
    }

    #[test]
    fn parse_key_combo_unicode() {
        assert_eq!(parse_key_combo("é").unwrap().code, KeyCode::Char('é'));
        let combo = parse_key_combo("M-ø").unwrap();
        assert_eq!(combo.code, KeyCode::Char('ø'));
        assert_eq!(combo.modifiers, KeyModifiers::ALT);
    }

    #[test]
    fn parse_key_combo_errors() {
        assert!(parse_key_combo("C-NotAKey").unwrap_err().contains("unknown key"));
        assert!(parse_key_combo("C-C-s").unwrap_err().contains("duplicate modifier"));
        assert!(parse_key_combo("Hyper-s").unwrap_err().contains("unknown modifier"));
        assert!(parse_key_combo("  ").unwrap_err().contains("empty key"));
    }

    #[test]
    fn action_names_are_unique_and_resolvable() {
        for (i, (name, action)) in ACTION_NAMES.iter().enumerate() {
            assert_eq!(action_from_str(&name.to_uppercase()), Some(*action));
            assert!(
                ACTION_NAMES[i + 1..].iter().all(|(other, _)| other != name),
                "duplicate action name {name}"
            );
        }
        assert_eq!(action_from_str("undo"), None);
    }

    #[test]
    fn load_keymap_builds_custom_bindings() {
        let file = TempKeymaps::new(
            "custom",
            r#"
[meta]
default = "mine"

[keymaps.mine]
description = "bold on b"

[keymaps.mine.normal]
"b" = "toggle_bold"
"C-b" = "move_left"
"#,
        );

        let (keymap, warnings) = load_keymap(None, Some(&file.0));
        assert!(warnings.is_empty(), "{warnings:?}");
        let Keymap::Custom(custom) = &keymap else {
            panic!("expected custom keymap, got {keymap:?}");
        };
        assert_eq!(custom.name, "mine");
        assert_eq!(custom.bindings.normal.len(), 2);

        let ctrl_b = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::CONTROL);
        let bare_b = KeyEvent::new(KeyCode::Char('b'), KeyModifiers::empty());
        assert_eq!(custom.translate(Mode::Normal, ctrl_b), Some(Action::Move(-1, 0)));
        assert_eq!(custom.translate(Mode::Normal, bare_b), Some(Action::ToggleBold));
        assert_eq!(custom.translate(Mode::Edit, bare_b), None);
    }

    #[test]
    fn load_keymap_unknown_request_falls_back_with_warning() {
        let file = TempKeymaps::new("fallback", "[meta]\ndefault = \"vim\"\n");
        let (keymap, warnings) = load_keymap(Some("nonexistent"), Some(&file.0));
        assert_eq!(keymap, Keymap::Vim);
        assert!(warnings.iter().any(|w| w.contains("not found in")));
        assert!(warnings.iter().any(|w| w.contains("Falling back")));
    }

    #[test]
    fn load_keymap_missing_explicit_file_warns() {
        let path = std::env::temp_dir().join("gridsheet_keymaps_does_not_exist.toml");
        let (keymap, warnings) = load_keymap(Some("emacs"), Some(&path));
        assert_eq!(keymap, Keymap::Emacs);
        assert!(warnings.iter().any(|w| w.contains("Keymap file not found")));
    }

    #[test]
    fn load_keymap_rejects_oversized_file() {
        let file = TempKeymaps::new(
            "large",
            &"#".repeat(MAX_KEYMAP_FILE_BYTES as usize + 1),
        );
        let (keymap, warnings) = load_keymap(None, Some(&file.0));
        assert_eq!(keymap, Keymap::Vim);
        assert!(
            warnings
                .iter()
                .any(|w| w.contains("file too large") && w.contains("Refusing to read"))
        );
    }

    #[test]
    fn load_keymap_rejects_excessive_bindings() {
        let mut content = String::from("[keymaps.big.normal]\n");
        for i in 0..=MAX_BINDINGS_PER_MODE {
            content.push_str(&format!("\"C-{}\" = \"save\"\n", i));
        }
        let file = TempKeymaps::new("many", &content);

        let (keymap, warnings) = load_keymap(Some("big"), Some(&file.0));
        assert_eq!(keymap, Keymap::Vim);
        assert!(warnings.iter().any(|w| w.contains("Too many normal bindings")));
    }

    #[test]
    fn load_keymap_rejects_duplicate_and_invalid_entries() {
        let file = TempKeymaps::new(
            "dups",
            r#"
[keymaps.dup.edit]
"C-s" = "save"
"ctrl-s" = "paste"
"x" = "undo"
"#,
        );

        let (keymap, warnings) = load_keymap(Some("dup"), Some(&file.0));
        assert_eq!(keymap, Keymap::Vim);
        assert!(
            warnings
                .iter()
                .any(|w| w.contains("Duplicate key") && w.contains("edit bindings"))
        );
        assert!(warnings.iter().any(|w| w.contains("Invalid action 'undo'")));
    }

    #[test]
    fn load_keymap_warns_when_default_keymap_is_missing() {
        let file = TempKeymaps::new(
            "missing_default",
            "[meta]\ndefault = \"nonexistent\"\n\n[keymaps.other]\n",
        );
        let (keymap, warnings) = load_keymap(None, Some(&file.0));
        assert_eq!(keymap, Keymap::Vim);
        assert!(
            warnings
                .iter()
                .any(|w| w.contains("Default keymap 'nonexistent' not found"))
        );
    }

    #[test]
    fn load_keymap_rejects_unknown_fields() {
        let file = TempKeymaps::new(
            "unknown_field",
            "[keymaps.mine]\nvisual = { v = \"cancel\" }\n",
        );
        let (keymap, warnings) = load_keymap(Some("mine"), Some(&file.0));
        assert_eq!(keymap, Keymap::Vim);
        assert!(warnings.iter().any(|w| w.contains("Failed to parse")));
    }
}

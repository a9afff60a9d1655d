//! `:` commands, shared by the TUI prompt and `--command` mode.

use crate::clipboard::ClipboardProvider;
use crate::error::{CommandError, Result};
use gridsheet_core::{
    CellRef, Document, FormatChange, Function, FunctionOutcome, GridsheetError, ToolbarState,
};
use gridsheet_engine::engine::{FontFamily, FontSize, Rgb, TextAlign};
use regex::Regex;
use std::path::PathBuf;
use std::sync::OnceLock;

fn arg_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""(?<quoted>[^"]*)"|(?<bare>\S+)"#).expect("argument regex must compile")
    })
}

/// Split arguments on whitespace; `"double quotes"` group words (and allow
/// an empty argument).
fn split_args(input: &str) -> Vec<String> {
    arg_re()
        .captures_iter(input)
        .filter_map(|caps| {
            caps.name("quoted")
                .or_else(|| caps.name("bare"))
                .map(|m| m.as_str().to_string())
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Quit { force: bool },
    Write(Option<PathBuf>),
    WriteQuit,
    Export(PathBuf),
    Import(PathBuf),
    Goto(CellRef),
    NewSheet,
    /// 1-based, as typed
    Sheet(usize),
    Sheets,
    Function(Function),
    Replace { search: String, replace: String },
    Format(FormatChange),
    Set(String),
    Move(CellRef),
    Copy,
    Cut,
    Paste,
    ColWidth(usize),
    Help,
}

/// What the front end should do after a command succeeded.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Message(String),
    Quit,
    ColumnWidth(usize),
    Help,
}

fn parse_address(input: &str) -> Result<CellRef> {
    CellRef::from_str(input).ok_or_else(|| GridsheetError::InvalidAddress(input.to_string()).into())
}

fn parse_value<T: std::str::FromStr<Err = String>>(input: &str) -> Result<T> {
    input
        .parse::<T>()
        .map_err(|err| GridsheetError::InvalidInput(err).into())
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(CommandError::Usage(usage))
    } else {
        Ok(rest)
    }
}

/// Parse a command line (with or without the leading `:`).
pub fn parse(input: &str) -> Result<Command> {
    let input = input.trim();
    let input = input.strip_prefix(':').unwrap_or(input).trim_start();
    let (name, rest) = match input.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (input, ""),
    };

    let command = match name {
        "q" | "quit" => Command::Quit { force: false },
        "q!" => Command::Quit { force: true },
        "w" | "save" => Command::Write((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "wq" | "x" => Command::WriteQuit,
        "export" => Command::Export(PathBuf::from(required(rest, "export <file.json>")?)),
        "e" | "open" | "import" => {
            Command::Import(PathBuf::from(required(rest, "import <file.json>")?))
        }
        "goto" | "g" => Command::Goto(parse_address(required(rest, "goto <cell>")?)?),
        "new" => Command::NewSheet,
        "sheet" => Command::Sheet(
            required(rest, "sheet <n>")?
                .parse()
                .map_err(|_| CommandError::Usage("sheet <n>"))?,
        ),
        "sheets" => Command::Sheets,
        "fn" => {
            let args = split_args(rest);
            let Some((name, args)) = args.split_first() else {
                return Err(CommandError::Usage("fn <NAME> [args]"));
            };
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            Command::Function(Function::parse(name, &args)?)
        }
        "replace" => match split_args(rest).as_slice() {
            [search] => Command::Replace {
                search: search.clone(),
                replace: String::new(),
            },
            [search, replace] => Command::Replace {
                search: search.clone(),
                replace: replace.clone(),
            },
            _ => return Err(CommandError::Usage("replace <search> [replace]")),
        },
        "font" => Command::Format(FormatChange::FontFamily(parse_value::<FontFamily>(
            required(rest, "font <monospace|sans-serif|fantasy|cursive>")?,
        )?)),
        "size" => Command::Format(FormatChange::FontSize(parse_value::<FontSize>(
            required(rest, "size <px>")?,
        )?)),
        "bold" => Command::Format(FormatChange::ToggleBold),
        "italic" => Command::Format(FormatChange::ToggleItalic),
        "underline" => Command::Format(FormatChange::ToggleUnderline),
        "color" | "fg" => Command::Format(FormatChange::TextColor(parse_value::<Rgb>(
            required(rest, "color <#rrggbb>")?,
        )?)),
        "bg" => Command::Format(FormatChange::BackgroundColor(parse_value::<Rgb>(
            required(rest, "bg <#rrggbb>")?,
        )?)),
        "align" => Command::Format(FormatChange::Align(parse_value::<TextAlign>(
            required(rest, "align <start|center|end>")?,
        )?)),
        "set" => Command::Set(rest.to_string()),
        "move" => Command::Move(parse_address(required(rest, "move <cell>")?)?),
        "copy" | "y" => Command::Copy,
        "cut" => Command::Cut,
        "paste" | "p" => Command::Paste,
        "colwidth" | "cw" => Command::ColWidth(
            required(rest, "colwidth <n>")?
                .parse()
                .map_err(|_| CommandError::Usage("colwidth <n>"))?,
        ),
        "help" | "h" => Command::Help,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

fn describe_format(change: FormatChange, toolbar: Option<&ToolbarState>) -> String {
    let Some(t) = toolbar else {
        return "Formatted".to_string();
    };
    match change {
        FormatChange::FontFamily(family) => format!("{}: font {}", t.address, family),
        FormatChange::FontSize(size) => format!("{}: size {}", t.address, size),
        FormatChange::ToggleBold => format!("{}: bold {}", t.address, on_off(t.is_bold)),
        FormatChange::ToggleItalic => format!("{}: italic {}", t.address, on_off(t.is_italic)),
        FormatChange::ToggleUnderline => {
            format!("{}: underline {}", t.address, on_off(t.is_underlined))
        }
        FormatChange::TextColor(color) => format!("{}: color {}", t.address, color),
        FormatChange::BackgroundColor(color) => format!("{}: background {}", t.address, color),
        FormatChange::Align(align) => format!("{}: align {}", t.address, align),
    }
}

fn describe_function(function: &Function, outcome: FunctionOutcome) -> String {
    match outcome {
        FunctionOutcome::Value(v) if v.is_infinite() => format!("{}: no numeric data", function),
        FunctionOutcome::Value(_) => format!("{} = {}", function, outcome),
        FunctionOutcome::Applied { .. } => format!("{}: {} changed", function, outcome),
    }
}

/// Run a parsed command against the document.
pub fn execute(
    doc: &mut Document,
    clipboard: &mut dyn ClipboardProvider,
    command: Command,
) -> Result<Outcome> {
    log::debug!("executing {:?}", command);
    let message = match command {
        Command::Quit { force } => {
            if !force && doc.modified {
                return Err(CommandError::UnsavedChanges);
            }
            return Ok(Outcome::Quit);
        }
        Command::Write(path) => {
            if let Some(path) = path {
                doc.file_path = Some(path);
            }
            let path = doc.save_file()?;
            format!("Saved to {}", path.display())
        }
        Command::WriteQuit => {
            doc.save_file()?;
            return Ok(Outcome::Quit);
        }
        Command::Export(path) => {
            doc.export_to(&path)?;
            format!("Exported to {}", path.display())
        }
        Command::Import(path) => {
            let count = doc.import_from(&path)?;
            if count > 0 {
                doc.focus_cell(CellRef::new(0, 0));
            }
            format!("Imported {} sheets from {}", count, path.display())
        }
        Command::Goto(cell_ref) => {
            doc.focus_cell(cell_ref);
            format!("Jumped to {}", cell_ref)
        }
        Command::NewSheet => {
            let index = doc.create_sheet();
            format!("Created {}", doc.sheets()[index].name)
        }
        Command::Sheet(number) => {
            let index = number.checked_sub(1).ok_or_else(|| {
                GridsheetError::InvalidInput("sheet numbers start at 1".to_string())
            })?;
            doc.select_sheet(index)?;
            format!("Sheet {}: {}", number, doc.sheets()[index].name)
        }
        Command::Sheets => {
            if doc.sheet_count() == 0 {
                "No sheets".to_string()
            } else {
                doc.sheets()
                    .iter()
                    .enumerate()
                    .map(|(i, sheet)| {
                        let marker = if Some(i) == doc.active_index() { "*" } else { "" };
                        format!("{}:{}{}", i + 1, sheet.name, marker)
                    })
                    .collect::<Vec<_>>()
                    .join("  ")
            }
        }
        Command::Function(function) => {
            let outcome = doc.run_function(&function)?;
            describe_function(&function, outcome)
        }
        Command::Replace { search, replace } => {
            let changed = doc.find_and_replace(&search, &replace)?;
            format!("Replaced '{}' in {} cells", search, changed)
        }
        Command::Format(change) => {
            if !doc.format_active(change) {
                return Err(if doc.active_store().is_none() {
                    GridsheetError::NoActiveSheet.into()
                } else {
                    GridsheetError::NoActiveCell.into()
                });
            }
            describe_format(change, doc.toolbar_state().as_ref())
        }
        Command::Set(text) => {
            doc.set_active_content(&text)?;
            let cell_ref = doc.active_cell().ok_or(GridsheetError::NoActiveCell)?;
            format!("{} = {}", cell_ref, text)
        }
        Command::Move(target) => {
            let source = doc.active_cell().ok_or(GridsheetError::NoActiveCell)?;
            doc.move_content(source, target)?;
            format!("Moved {} to {}", source, target)
        }
        Command::Copy => {
            let text = doc.copy_active()?;
            clipboard.set_text(text.clone());
            format!("Copied '{}'", text)
        }
        Command::Cut => {
            let text = doc.cut_active()?;
            clipboard.set_text(text.clone());
            format!("Cut '{}'", text)
        }
        Command::Paste => {
            let text = clipboard.get_text().ok_or(CommandError::ClipboardEmpty)?;
            doc.paste_active(&text)?;
            let cell_ref = doc.active_cell().ok_or(GridsheetError::NoActiveCell)?;
            format!("Pasted into {}", cell_ref)
        }
        Command::ColWidth(width) => return Ok(Outcome::ColumnWidth(width)),
        Command::Help => return Ok(Outcome::Help),
    };
    Ok(Outcome::Message(message))
}

/// Parse and run one command line.
pub fn run_line(
    doc: &mut Document,
    clipboard: &mut dyn ClipboardProvider,
    line: &str,
) -> Result<Outcome> {
    log::info!("command: {}", line.trim());
    let command = parse(line)?;
    execute(doc, clipboard, command)
}

/// Command reference shown by `:help` and `--command help`.
pub fn commands_help() -> Vec<String> {
    vec![
        "Commands",
        "",
        "File:",
        "  :w [file]              Save workbook (JSON)",
        "  :export <file>         Export without changing the save target",
        "  :e / :import <file>    Open workbook (JSON)",
        "  :q                     Quit",
        "  :q!                    Force quit",
        "  :wq                    Save and quit",
        "",
        "Sheets:",
        "  :new                   New sheet",
        "  :sheet <n>             Switch to sheet n",
        "  :sheets                List sheets",
        "",
        "Cells:",
        "  :goto <cell>           Focus a cell (e.g. :goto B12)",
        "  :set <text>            Set content (number or letters)",
        "  :move <cell>           Copy content of the focused cell to <cell>",
        "  :copy / :cut / :paste  Clipboard",
        "",
        "Format:",
        "  :font <family>         monospace, sans-serif, fantasy, cursive",
        "  :size <px>             Font size (14, 16, 18, 20, ...)",
        "  :bold :italic :underline",
        "  :color <#rrggbb>       Text color",
        "  :bg <#rrggbb>          Background color",
        "  :align <a>             start, center, end",
        "",
        "Functions:",
        "  :fn SUM|AVERAGE|MAX|MIN|COUNT",
        "  :fn TRIM|UPPER|LOWER   Focused cell",
        "  :fn REMOVE_DUPLICATES",
        "  :replace <find> [with] Literal find and replace (quote to keep spaces)",
        "",
        "Display:",
        "  :colwidth <n>          Set column width",
        "  :help                  This help",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use gridsheet_engine::builtins::Aggregate;

    fn r(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    fn fresh() -> (Document, MemoryClipboard) {
        let mut doc = Document::new();
        doc.create_sheet();
        doc.focus_cell(r("A1"));
        (doc, MemoryClipboard::new())
    }

    fn run(doc: &mut Document, clipboard: &mut MemoryClipboard, line: &str) -> Result<Outcome> {
        run_line(doc, clipboard, line)
    }

    fn message(outcome: Outcome) -> String {
        match outcome {
            Outcome::Message(m) => m,
            other => panic!("expected message, got {other:?}"),
        }
    }

    #[test]
    fn split_args_respects_quotes() {
        assert_eq!(split_args(r#"a "b c" d"#), ["a", "b c", "d"]);
        assert_eq!(split_args(r#""x" """#), ["x", ""]);
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn parse_basic_commands() {
        assert_eq!(parse(":q").unwrap(), Command::Quit { force: false });
        assert_eq!(parse("q!").unwrap(), Command::Quit { force: true });
        assert_eq!(parse("w").unwrap(), Command::Write(None));
        assert_eq!(
            parse("w out.json").unwrap(),
            Command::Write(Some(PathBuf::from("out.json")))
        );
        assert_eq!(parse("goto b12").unwrap(), Command::Goto(r("B12")));
        assert_eq!(parse("sheet 2").unwrap(), Command::Sheet(2));
        assert_eq!(
            parse("fn sum").unwrap(),
            Command::Function(Function::Aggregate(Aggregate::Sum))
        );
        assert_eq!(
            parse("align centre").unwrap(),
            Command::Format(FormatChange::Align(TextAlign::Center))
        );
        assert_eq!(parse("set").unwrap(), Command::Set(String::new()));
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(parse("frobnicate"), Err(CommandError::Unknown(c)) if c == "frobnicate"));
        assert!(matches!(parse("goto"), Err(CommandError::Usage(_))));
        assert!(matches!(
            parse("goto AA1"),
            Err(CommandError::Core(GridsheetError::InvalidAddress(_)))
        ));
        assert!(matches!(
            parse("size 0"),
            Err(CommandError::Core(GridsheetError::InvalidInput(_)))
        ));
        assert!(matches!(
            parse("color red"),
            Err(CommandError::Core(GridsheetError::InvalidInput(_)))
        ));
        assert!(matches!(
            parse("fn MEDIAN"),
            Err(CommandError::Core(GridsheetError::UnknownFunction(_)))
        ));
        assert!(matches!(parse("replace"), Err(CommandError::Usage(_))));
    }

    #[test]
    fn aggregate_scenario() {
        let (mut doc, mut cb) = fresh();
        run(&mut doc, &mut cb, "set 10").unwrap();
        run(&mut doc, &mut cb, "goto A2").unwrap();
        run(&mut doc, &mut cb, "set 20").unwrap();
        run(&mut doc, &mut cb, "goto A3").unwrap();
        run(&mut doc, &mut cb, "set abc").unwrap();

        let sum = message(run(&mut doc, &mut cb, "fn SUM").unwrap());
        assert_eq!(sum, "SUM = 30");
        let count = message(run(&mut doc, &mut cb, "fn count").unwrap());
        assert_eq!(count, "COUNT = 2");
    }

    #[test]
    fn max_without_numbers_reports_no_data() {
        let (mut doc, mut cb) = fresh();
        run(&mut doc, &mut cb, "set abc").unwrap();
        let max = message(run(&mut doc, &mut cb, "fn MAX").unwrap());
        assert_eq!(max, "MAX: no numeric data");
    }

    #[test]
    fn quit_refuses_unsaved_changes() {
        let (mut doc, mut cb) = fresh();
        assert!(matches!(
            run(&mut doc, &mut cb, "q"),
            Err(CommandError::UnsavedChanges)
        ));
        assert_eq!(run(&mut doc, &mut cb, "q!").unwrap(), Outcome::Quit);
        doc.modified = false;
        assert_eq!(run(&mut doc, &mut cb, "q").unwrap(), Outcome::Quit);
    }

    #[test]
    fn clipboard_commands_round_trip() {
        let (mut doc, mut cb) = fresh();
        assert!(matches!(
            run(&mut doc, &mut cb, "paste"),
            Err(CommandError::ClipboardEmpty)
        ));
        run(&mut doc, &mut cb, "set hello").unwrap();
        assert_eq!(message(run(&mut doc, &mut cb, "cut").unwrap()), "Cut 'hello'");
        assert_eq!(doc.get_or_default(&r("A1")).content, "");
        run(&mut doc, &mut cb, "goto C3").unwrap();
        run(&mut doc, &mut cb, "paste").unwrap();
        assert_eq!(doc.get_or_default(&r("C3")).content, "hello");
    }

    #[test]
    fn format_commands_report_state() {
        let (mut doc, mut cb) = fresh();
        assert_eq!(message(run(&mut doc, &mut cb, "bold").unwrap()), "A1: bold on");
        assert_eq!(message(run(&mut doc, &mut cb, "bold").unwrap()), "A1: bold off");
        assert_eq!(
            message(run(&mut doc, &mut cb, "bg #ABCDEF").unwrap()),
            "A1: background #abcdef"
        );
        assert_eq!(message(run(&mut doc, &mut cb, "size 18").unwrap()), "A1: size 18px");
    }

    #[test]
    fn format_without_sheet_is_an_error() {
        let mut doc = Document::new();
        let mut cb = MemoryClipboard::new();
        assert!(matches!(
            run(&mut doc, &mut cb, "italic"),
            Err(CommandError::Core(GridsheetError::NoActiveSheet))
        ));
        doc.create_sheet();
        assert!(matches!(
            run(&mut doc, &mut cb, "italic"),
            Err(CommandError::Core(GridsheetError::NoActiveCell))
        ));
    }

    #[test]
    fn sheet_commands() {
        let (mut doc, mut cb) = fresh();
        assert_eq!(message(run(&mut doc, &mut cb, "new").unwrap()), "Created Sheet 2");
        assert_eq!(message(run(&mut doc, &mut cb, "sheets").unwrap()), "1:Sheet 1  2:Sheet 2*");
        assert_eq!(message(run(&mut doc, &mut cb, "sheet 1").unwrap()), "Sheet 1: Sheet 1");
        assert!(matches!(
            run(&mut doc, &mut cb, "sheet 3"),
            Err(CommandError::Core(GridsheetError::SheetIndexOutOfRange { index: 2, count: 2 }))
        ));
        assert!(matches!(
            run(&mut doc, &mut cb, "sheet 0"),
            Err(CommandError::Core(GridsheetError::InvalidInput(_)))
        ));
    }

    #[test]
    fn replace_with_quoted_arguments() {
        let (mut doc, mut cb) = fresh();
        run(&mut doc, &mut cb, "set concatenate").unwrap();
        let msg = message(run(&mut doc, &mut cb, r#"replace "cat" "dog""#).unwrap());
        assert_eq!(msg, "Replaced 'cat' in 1 cells");
        assert_eq!(doc.get_or_default(&r("A1")).content, "condogenate");
    }

    #[test]
    fn move_copies_content_to_target() {
        let (mut doc, mut cb) = fresh();
        run(&mut doc, &mut cb, "set 42").unwrap();
        assert_eq!(message(run(&mut doc, &mut cb, "move B1").unwrap()), "Moved A1 to B1");
        assert_eq!(doc.get_or_default(&r("B1")).content, "42");
        assert_eq!(doc.get_or_default(&r("A1")).content, "42");
    }

    #[test]
    fn invalid_set_is_reported() {
        let (mut doc, mut cb) = fresh();
        assert!(matches!(
            run(&mut doc, &mut cb, "set a-b"),
            Err(CommandError::Core(GridsheetError::InvalidInput(_)))
        ));
        assert!(doc.active_store().unwrap().is_empty());
    }
}

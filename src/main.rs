//! Gridsheet - a terminal spreadsheet editor with cell formatting, range
//! functions and JSON workbooks.

mod clipboard;
mod command;
mod error;
mod logging;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Context;
use clipboard::MemoryClipboard;
use command::Outcome;
use gridsheet_core::{CellRef, Document};
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: gridsheet [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Workbook to open (.json)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <CMD>       Run a command without the UI (can be repeated)");
    eprintln!("  -o, --output <FILE>       Export the workbook to FILE (non-interactive)");
    eprintln!("  --keymap <name>           Select keybindings (default: vim)");
    eprintln!("  --keymap-file <path>      Load keybindings from TOML file");
    eprintln!("  --log-file <path>         Append log records to path (level: $GRIDSHEET_LOG)");
    eprintln!("  -h, --help                Print help");
}

#[derive(Debug, Default)]
struct Args {
    file_path: Option<PathBuf>,
    commands: Vec<String>,
    output_file: Option<PathBuf>,
    keymap_name: Option<String>,
    keymap_file: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn parse_args() -> Args {
    let args: Vec<String> = env::args().collect();
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let next = args.get(i + 1).cloned();
        let mut value = |what: &str| -> String {
            i += 1;
            match &next {
                Some(v) => v.clone(),
                None => fail(&format!("{} requires {}", flag, what)),
            }
        };
        match flag {
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            "-c" | "--command" => parsed.commands.push(value("a command")),
            "-o" | "--output" => parsed.output_file = Some(PathBuf::from(value("a file path"))),
            "--keymap" => parsed.keymap_name = Some(value("a value")),
            "--keymap-file" => parsed.keymap_file = Some(PathBuf::from(value("a file path"))),
            "--log-file" => parsed.log_file = Some(PathBuf::from(value("a file path"))),
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            arg => {
                if parsed.file_path.is_some() {
                    eprintln!("Error: Unexpected argument: {}", arg);
                    print_usage();
                    std::process::exit(1);
                }
                parsed.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }
    parsed
}

/// Run `--command`s in order, then export with `--output`. Stops at the
/// first failing command.
fn run_batch(args: &Args) -> anyhow::Result<()> {
    let mut doc = Document::with_file(args.file_path.clone())
        .with_context(|| match &args.file_path {
            Some(path) => format!("failed to open {}", path.display()),
            None => "failed to create workbook".to_string(),
        })?;
    if doc.sheet_count() == 0 {
        doc.create_sheet();
        doc.modified = false;
    }
    doc.focus_cell(CellRef::new(0, 0));

    let mut clipboard = MemoryClipboard::new();
    for line in &args.commands {
        match command::run_line(&mut doc, &mut clipboard, line)
            .with_context(|| format!("command '{}' failed", line.trim()))?
        {
            Outcome::Message(message) => println!("{}", message),
            Outcome::Help => {
                for text in command::commands_help() {
                    println!("{}", text);
                }
            }
            Outcome::ColumnWidth(_) => {}
            Outcome::Quit => break,
        }
    }

    if let Some(output_path) = &args.output_file {
        doc.export_to(output_path)
            .with_context(|| format!("failed to export {}", output_path.display()))?;
        println!("Exported to {}", output_path.display());
    }
    Ok(())
}

#[cfg(feature = "tui")]
fn run_interactive(args: Args) -> anyhow::Result<()> {
    let (keymap, warnings) =
        tui::load_keymap(args.keymap_name.as_deref(), args.keymap_file.as_ref());
    for warning in warnings {
        log::warn!("{}", warning);
        eprintln!("Warning: {}", warning);
    }

    let mut app = tui::App::with_file(args.file_path, keymap).context("failed to start")?;
    tui::run(&mut app).context("terminal error")?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_interactive(_args: Args) -> anyhow::Result<()> {
    anyhow::bail!("built without the terminal UI; use --command or --output")
}

fn main() {
    let args = parse_args();

    if let Some(path) = &args.log_file
        && let Err(e) = logging::init(path)
    {
        fail(&format!("{:#}", e));
    }

    let result = if args.commands.is_empty() && args.output_file.is_none() {
        run_interactive(args)
    } else {
        run_batch(&args)
    };
    if let Err(e) = result {
        log::error!("{:#}", e);
        fail(&format!("{:#}", e));
    }
}

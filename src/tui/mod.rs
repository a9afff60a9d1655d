//! Terminal front end (ratatui + crossterm).

mod actions;
mod app;
mod help;
mod input;
mod keymap;
mod ui;

pub use app::App;
pub use keymap::load_keymap;

use crossterm::{
    ExecutableCommand,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};

/// Take over the terminal and run the event loop until the user quits.
pub fn run(app: &mut App) -> io::Result<()> {
    terminal::enable_raw_mode()?;

    // Restores the terminal on every exit path, panics included.
    struct Cleanup;
    impl Drop for Cleanup {
        fn drop(&mut self) {
            let _ = stdout().execute(DisableMouseCapture);
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = terminal::disable_raw_mode();
        }
    }
    let _cleanup = Cleanup;

    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    log::info!("terminal session started");
    let result = input::run_app(&mut terminal, app);
    log::info!("terminal session ended");
    result
}

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use gridsheet_core::CellRef;
use ratatui::prelude::*;
use std::io;

use super::actions::{ApplyResult, apply_action, handle_text};
use super::app::{App, Mode};
use super::keymap::{Action, Keymap, translate};
use super::ui;

/// Left-button drag: press on a cell picks it up, release on another cell
/// moves the content there.
fn handle_mouse_event(
    app: &mut App,
    terminal_area: Rect,
    mouse: MouseEvent,
    drag_origin: &mut Option<CellRef>,
) {
    if app.help_modal || app.mode != Mode::Normal {
        *drag_origin = None;
        return;
    }
    let chunks = ui::split_main_chunks(terminal_area);
    let hit = ui::grid_cell_at(app, chunks.grid, mouse.column, mouse.row)
        .map(|(col, row)| CellRef::new(col, row));

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            *drag_origin = hit;
            if let Some(cell_ref) = hit {
                app.set_cursor(cell_ref);
                app.pending_g = false;
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let (Some(source), Some(target)) = (drag_origin.take(), hit)
                && source != target
            {
                app.drop_content(source, target);
            }
        }
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_help_modal(),
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.close_help_modal()
        }
        KeyCode::Down | KeyCode::Char('j') => app.scroll_help_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_help_by(-1),
        KeyCode::PageDown => app.scroll_help_by(12),
        KeyCode::PageUp => app.scroll_help_by(-12),
        KeyCode::Home | KeyCode::Char('g') => app.scroll_help_to_top(),
        KeyCode::End | KeyCode::Char('G') => app.scroll_help_to_end(),
        _ => {}
    }
}

/// Route one key press. Returns `ApplyResult::Quit` when the app should exit.
pub(crate) fn handle_key(app: &mut App, key: KeyEvent) -> ApplyResult {
    if app.help_modal {
        handle_help_key(app, key);
        return ApplyResult::Continue;
    }

    // Vim `gg`; a lone `g` followed by anything else opens the goto prompt
    if matches!(app.keymap, Keymap::Vim) && app.mode == Mode::Normal {
        if key.code == KeyCode::Char('g') && key.modifiers.is_empty() {
            if std::mem::take(&mut app.pending_g) {
                return apply_action(app, Action::GotoFirst);
            }
            app.pending_g = true;
            return ApplyResult::Continue;
        }
        if std::mem::take(&mut app.pending_g) {
            return apply_action(app, Action::OpenGotoPrompt);
        }
    }

    if let Some(action) = translate(&app.keymap, app.mode, key) {
        return apply_action(app, action);
    }

    // Text entry fallbacks (not bound in keymaps).
    handle_text(app, key);
    ApplyResult::Continue
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let mut drag_origin: Option<CellRef> = None;
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        match event::read()? {
            // Only key presses; Windows also reports releases
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if handle_key(app, key) == ApplyResult::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let terminal_area = Rect::new(0, 0, size.width, size.height);
                handle_mouse_event(app, terminal_area, mouse, &mut drag_origin);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: MouseEventKind, col: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: col,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn body_cell_point(app: &App, grid_area: Rect, col: usize, row: usize) -> (u16, u16) {
        let mut x = grid_area.x + 1 + ui::ROW_HEADER_WIDTH + ui::GRID_COLUMN_SPACING;
        for c in app.viewport_col..col {
            x += app.get_column_width(c) as u16 + ui::GRID_COLUMN_SPACING;
        }
        (x, grid_area.y + 2 + (row - app.viewport_row) as u16)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    #[test]
    fn click_focuses_cell_and_clears_pending_g() {
        let mut app = App::new();
        app.pending_g = true;
        let area = Rect::new(0, 0, 100, 30);
        let grid = ui::split_main_chunks(area).grid;
        let (x, y) = body_cell_point(&app, grid, 1, 2);
        let mut origin = None;

        handle_mouse_event(
            &mut app,
            area,
            mouse(MouseEventKind::Down(MouseButton::Left), x, y),
            &mut origin,
        );

        assert_eq!(app.current_cell_ref(), CellRef::new(1, 2));
        assert_eq!(app.doc.active_cell(), Some(CellRef::new(1, 2)));
        assert!(!app.pending_g);
        assert_eq!(origin, Some(CellRef::new(1, 2)));
    }

    #[test]
    fn drag_and_drop_moves_content() {
        let mut app = App::new();
        app.doc.set_active_content("7").unwrap();
        let area = Rect::new(0, 0, 100, 30);
        let grid = ui::split_main_chunks(area).grid;
        let (x0, y0) = body_cell_point(&app, grid, 0, 0);
        let (x1, y1) = body_cell_point(&app, grid, 2, 3);
        let mut origin = None;

        handle_mouse_event(
            &mut app,
            area,
            mouse(MouseEventKind::Down(MouseButton::Left), x0, y0),
            &mut origin,
        );
        handle_mouse_event(
            &mut app,
            area,
            mouse(MouseEventKind::Up(MouseButton::Left), x1, y1),
            &mut origin,
        );

        assert_eq!(app.doc.get_or_default(&CellRef::new(2, 3)).content, "7");
        assert_eq!(app.doc.get_or_default(&CellRef::new(0, 0)).content, "7");
        assert_eq!(origin, None);
    }

    #[test]
    fn clicks_are_ignored_outside_normal_mode() {
        let mut app = App::new();
        app.mode = Mode::Edit;
        let area = Rect::new(0, 0, 100, 30);
        let grid = ui::split_main_chunks(area).grid;
        let (x, y) = body_cell_point(&app, grid, 3, 3);
        let mut origin = None;

        handle_mouse_event(
            &mut app,
            area,
            mouse(MouseEventKind::Down(MouseButton::Left), x, y),
            &mut origin,
        );

        assert_eq!(app.current_cell_ref(), CellRef::new(0, 0));
    }

    #[test]
    fn gg_goes_to_first_cell_and_g_then_other_opens_goto() {
        let mut app = App::new();
        app.set_cursor(CellRef::new(4, 9));
        handle_key(&mut app, key('g'));
        handle_key(&mut app, key('g'));
        assert_eq!(app.current_cell_ref(), CellRef::new(0, 0));

        handle_key(&mut app, key('g'));
        handle_key(&mut app, key('x'));
        assert_eq!(app.mode, Mode::Command);
        assert_eq!(app.command_buffer, "goto ");
    }

    #[test]
    fn edit_mode_types_and_commits() {
        let mut app = App::new();
        handle_key(&mut app, key('i'));
        for c in "12".chars() {
            handle_key(&mut app, key(c));
        }
        handle_key(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.doc.get_or_default(&CellRef::new(0, 0)).content, "12");
    }

    #[test]
    fn help_modal_swallows_keys() {
        let mut app = App::new();
        handle_key(&mut app, key('?'));
        assert!(app.help_modal);
        handle_key(&mut app, key('j'));
        assert_eq!(app.help_scroll, 1);
        assert_eq!(app.current_cell_ref(), CellRef::new(0, 0));
        handle_key(&mut app, key('q'));
        assert!(!app.help_modal);
    }
}

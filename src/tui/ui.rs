//! UI rendering

use super::app::{App, Mode};
use super::help::{get_about_help, get_functions_help, get_help_text};
use crate::command::commands_help;
use gridsheet_core::{CellRef, ToolbarState};
use gridsheet_engine::engine::{Cell as SheetCell, Rgb, TextAlign};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
};

pub(crate) const FORMULA_BAR_HEIGHT: u16 = 3;
pub(crate) const TOOLBAR_HEIGHT: u16 = 1;
pub(crate) const GRID_MIN_HEIGHT: u16 = 10;
pub(crate) const TABS_HEIGHT: u16 = 1;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 4;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

/// Screen regions, top to bottom.
#[derive(Clone, Copy, Debug)]
pub(crate) struct MainChunks {
    pub formula: Rect,
    pub toolbar: Rect,
    pub grid: Rect,
    pub tabs: Rect,
    pub status: Rect,
}

pub(crate) fn split_main_chunks(area: Rect) -> MainChunks {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORMULA_BAR_HEIGHT),
            Constraint::Length(TOOLBAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(TABS_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    MainChunks {
        formula: chunks[0],
        toolbar: chunks[1],
        grid: chunks[2],
        tabs: chunks[3],
        status: chunks[4],
    }
}

/// Map a terminal position to the (col, row) of the grid cell under it.
pub(crate) fn grid_cell_at(
    app: &App,
    grid_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<(usize, usize)> {
    if grid_area.width < 3 || grid_area.height < 4 {
        return None;
    }

    // inside the border
    let inner = Rect::new(
        grid_area.x + 1,
        grid_area.y + 1,
        grid_area.width - 2,
        grid_area.height - 2,
    );
    if mouse_col < inner.x
        || mouse_col >= inner.right()
        || mouse_row < inner.y
        || mouse_row >= inner.bottom()
    {
        return None;
    }

    // Header row holds column letters.
    if mouse_row == inner.y {
        return None;
    }
    let rel_row = (mouse_row - inner.y - 1) as usize;
    if rel_row >= app.visible_rows {
        return None;
    }
    let row = app.viewport_row + rel_row;
    if row >= app.max_rows {
        return None;
    }

    let mut x = inner.x + ROW_HEADER_WIDTH + GRID_COLUMN_SPACING;
    if mouse_col < x {
        return None;
    }
    for col in (app.viewport_col..app.max_cols).take(app.visible_cols) {
        let cell_end = x.saturating_add(app.get_column_width(col) as u16);
        if mouse_col < cell_end {
            return (mouse_col >= x).then_some((col, row));
        }
        x = cell_end.saturating_add(GRID_COLUMN_SPACING);
        if mouse_col < x || x >= inner.right() {
            return None;
        }
    }

    None
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let available_width = chunks.grid.width.saturating_sub(ROW_HEADER_WIDTH + 2) as usize;
    let available_height = chunks.grid.height.saturating_sub(3) as usize; // header + borders
    app.visible_cols = (available_width / (app.col_width + 1)).max(1);
    app.visible_rows = available_height.max(1);
    app.update_viewport();

    draw_formula_bar(f, app, chunks.formula);
    draw_toolbar(f, app, chunks.toolbar);
    draw_grid(f, app, chunks.grid);
    draw_sheet_tabs(f, app, chunks.tabs);
    draw_status_bar(f, app, chunks.status);

    if app.help_modal {
        draw_help_modal(f, app);
    }
}

fn draw_formula_bar(f: &mut Frame, app: &App, area: Rect) {
    let cell_ref = app.current_cell_ref();

    let content = match app.mode {
        Mode::Edit => {
            let (before, after) = app.edit_buffer.split_at(app.edit_cursor);
            format!("{}: {}│{}", cell_ref, before, after)
        }
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Normal => {
            let content = app.doc.get_or_default(&cell_ref).content;
            if content.is_empty() {
                format!("{}: (empty)", cell_ref)
            } else {
                format!("{}: {}", cell_ref, content)
            }
        }
    };

    let (title, color) = match app.mode {
        Mode::Edit => (" Edit ", Color::Yellow),
        Mode::Command => (" Command ", Color::Cyan),
        Mode::Normal => (" Cell ", Color::White),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(color));

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn flag_span(label: &'static str, on: bool) -> Span<'static> {
    if on {
        Span::styled(
            label,
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}

fn swatch(color: Rgb) -> Span<'static> {
    Span::styled("  ", Style::default().bg(to_color(color)))
}

/// Formatting controls of the focused cell.
fn toolbar_line(toolbar: &ToolbarState) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    Line::from(vec![
        Span::styled(format!(" {} ", toolbar.address), Style::default().fg(Color::Cyan)),
        Span::styled(" font ", dim),
        Span::raw(toolbar.font_family.to_string()),
        Span::styled("  size ", dim),
        Span::raw(toolbar.font_size.to_string()),
        Span::raw("  "),
        flag_span(" B ", toolbar.is_bold),
        Span::raw(" "),
        flag_span(" I ", toolbar.is_italic),
        Span::raw(" "),
        flag_span(" U ", toolbar.is_underlined),
        Span::styled("  align ", dim),
        Span::raw(toolbar.text_align.to_string()),
        Span::styled("  fg ", dim),
        Span::raw(toolbar.color.to_string()),
        Span::raw(" "),
        swatch(toolbar.color),
        Span::styled("  bg ", dim),
        Span::raw(toolbar.background_color.to_string()),
        Span::raw(" "),
        swatch(toolbar.background_color),
    ])
}

fn draw_toolbar(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.doc.toolbar_state() {
        Some(toolbar) => toolbar_line(&toolbar),
        None => Line::styled(" No cell selected", Style::default().fg(Color::DarkGray)),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

fn to_alignment(align: TextAlign) -> Alignment {
    match align {
        TextAlign::Start => Alignment::Left,
        TextAlign::Center => Alignment::Center,
        TextAlign::End => Alignment::Right,
    }
}

/// Terminal style for a record. Colors equal to the defaults are left to
/// the terminal theme.
pub(crate) fn cell_style(cell: &SheetCell) -> Style {
    let mut style = Style::default();
    if cell.color != Rgb::BLACK {
        style = style.fg(to_color(cell.color));
    }
    if cell.background_color != Rgb::WHITE {
        style = style.bg(to_color(cell.background_color));
    }
    if cell.is_bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if cell.is_italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if cell.is_underlined {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    style
}

fn header_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let cols: Vec<usize> = (app.viewport_col..app.max_cols)
        .take(app.visible_cols)
        .collect();

    let mut header_cells = vec![Cell::from(" ")]; // Corner
    header_cells.extend(cols.iter().map(|&col| {
        Cell::from(CellRef::col_to_letters(col)).style(header_style(col == app.cursor_col))
    }));
    let header = Row::new(header_cells).height(1);

    let store = app.doc.active_store();
    let rows: Vec<Row> = (app.viewport_row..app.max_rows)
        .take(app.visible_rows)
        .map(|row| {
            let mut cells = vec![
                Cell::from(format!("{}", row + 1)).style(header_style(row == app.cursor_row)),
            ];
            for &col in &cols {
                let cell_ref = CellRef::new(col, row);
                let record = store.and_then(|s| s.get(&cell_ref));
                let (text, align, base) = match record {
                    Some(cell) => (cell.content.clone(), cell.text_align, cell_style(cell)),
                    None => (String::new(), TextAlign::Start, Style::default()),
                };

                let style = if row == app.cursor_row && col == app.cursor_col {
                    base.fg(Color::Black).bg(Color::Cyan)
                } else if app.move_source == Some(cell_ref) {
                    base.bg(Color::Magenta)
                } else {
                    base
                };
                cells.push(Cell::from(Line::from(text).alignment(to_alignment(align))).style(style));
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    widths.extend(
        cols.iter()
            .map(|&col| Constraint::Length(app.get_column_width(col) as u16)),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(" Gridsheet "))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn draw_sheet_tabs(f: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = app
        .doc
        .sheets()
        .iter()
        .map(|sheet| format!(" {} ", sheet.name))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.doc.active_index().unwrap_or(0))
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let file_info = match (&app.doc.file_path, app.doc.modified) {
        (Some(path), true) => format!("{} [+]", path.display()),
        (Some(path), false) => path.display().to_string(),
        (None, true) => "[New File] [+]".to_string(),
        (None, false) => "[New File]".to_string(),
    };

    let status = if app.status_message.is_empty() {
        format!(
            "{}  |  [{}]  |  {}",
            file_info,
            app.keymap.name(),
            app.keymap.status_hint()
        )
    } else {
        app.status_message.clone()
    };

    let style = if app.status_message.starts_with("Error") {
        Style::default().fg(Color::Red)
    } else if !app.status_message.is_empty() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    f.render_widget(Paragraph::new(Line::from(Span::styled(status, style))), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Section titles are cyan, headings yellow, indented entries white.
fn help_section(lines: &mut Vec<Line<'static>>, title: &str, texts: Vec<String>) {
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    for text in texts {
        let style = if text == title {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if text.starts_with("  ") {
            Style::default().fg(Color::White)
        } else {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
}

fn draw_help_modal(f: &mut Frame, app: &App) {
    let area = centered_rect(88, 88, f.area());
    let modal_style = Style::default().fg(Color::White).bg(Color::Black);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" About Gridsheet ")
        .border_style(Style::default().fg(Color::Green))
        .style(modal_style);

    let mut lines: Vec<Line> = Vec::new();
    help_section(&mut lines, "About Gridsheet", get_about_help());
    help_section(&mut lines, "Keys", get_help_text(&app.keymap));
    help_section(&mut lines, "Commands", commands_help());
    help_section(&mut lines, "Functions", get_functions_help());

    let viewport_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport_height);
    let scroll_y = u16::try_from(app.help_scroll.min(max_scroll)).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .scroll((scroll_y, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}

//! UI rendering

use crate::app::{App, Focus};
use crate::input::TextInput;
use crate::labels;
use common::io::drom::Part;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::time::Instant;

pub const GRID_COLUMNS: usize = 3;
/// Two border rows plus one row per card line
pub const CARD_HEIGHT: u16 = 8;

/// Render the entire UI
pub fn render<R>(frame: &mut Frame, app: &App<R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Inputs + button
            Constraint::Min(0),    // Spinner, cards or "no data"
            Constraint::Length(1), // Toast or key help
        ])
        .split(frame.area());

    render_title(frame, chunks[0]);
    render_form(frame, app, chunks[1]);
    render_results(frame, app, chunks[2]);
    render_status_line(frame, app, chunks[3]);
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        labels::TITLE,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

fn render_form<R>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(42),
            Constraint::Percentage(42),
            Constraint::Percentage(16),
        ])
        .split(area);

    render_text_input(
        frame,
        labels::SEARCH_INPUT,
        &app.search_input,
        app.focus == Focus::Search,
        cols[0],
    );
    render_text_input(
        frame,
        labels::MODEL_INPUT,
        &app.model_input,
        app.focus == Focus::Model,
        cols[1],
    );
    render_button(frame, app.focus == Focus::Button, cols[2]);
}

fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_text_input(frame: &mut Frame, label: &str, input: &TextInput, focused: bool, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(focused))
        .title(label.to_string());

    if !focused {
        frame.render_widget(Paragraph::new(input.text.as_str()).block(block), area);
        return;
    }

    // Block cursor on the char under it, or a bar past the end
    let (before, after) = input.text.split_at(input.cursor);
    let mut chars = after.chars();
    let cursor_char = chars.next();
    let after_cursor = chars.as_str();

    // scroll right far enough that the cursor cell stays inside the borders
    let cursor_col = Span::raw(before).width();
    let inner_width = usize::from(area.width.saturating_sub(2));
    let offset = u16::try_from((cursor_col + 1).saturating_sub(inner_width)).unwrap_or(u16::MAX);

    let mut spans = vec![Span::raw(before)];
    match cursor_char {
        Some(c) => spans.push(Span::styled(
            c.to_string(),
            Style::default().fg(Color::Black).bg(Color::White),
        )),
        None => spans.push(Span::styled("█", Style::default().fg(Color::White))),
    }
    spans.push(Span::raw(after_cursor));

    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .block(block)
            .scroll((0, offset)),
        area,
    );
}

fn render_button(frame: &mut Frame, focused: bool, area: Rect) {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };
    let button = Paragraph::new(Line::from(Span::styled(labels::SEARCH_BUTTON, style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(focus_border(focused)),
        );
    frame.render_widget(button, area);
}

fn render_results<R>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let state = app.view.state();
    if state.loading {
        render_spinner(frame, app.loading_started, area);
    } else if state.parts.is_empty() {
        render_message(frame, labels::NO_DATA, Style::default(), area);
    } else {
        render_grid(
            frame,
            &state.parts,
            app.selected,
            app.focus == Focus::Results,
            area,
        );
    }
}

/// One line, centered, a row below the top of `area`
fn render_message(frame: &mut Frame, text: &str, style: Style, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);
    let message = Paragraph::new(Line::from(Span::styled(text.to_string(), style)))
        .alignment(Alignment::Center);
    frame.render_widget(message, rows[1]);
}

fn render_spinner(frame: &mut Frame, started_at: Instant, area: Rect) {
    let text = format!("{} {}", spinner_frame(started_at), labels::LOADING);
    render_message(frame, &text, Style::default().fg(Color::Yellow), area);
}

fn render_grid(frame: &mut Frame, parts: &[Part], selected: usize, focused: bool, area: Rect) {
    let visible_rows = usize::from((area.height / CARD_HEIGHT).max(1));
    // keep the selected card's row on screen
    let first_row = (selected / GRID_COLUMNS).saturating_sub(visible_rows - 1);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (i, row_area) in rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); GRID_COLUMNS])
            .split(*row_area);

        for (c, card_area) in cols.iter().enumerate() {
            let idx = (first_row + i) * GRID_COLUMNS + c;
            if let Some(part) = parts.get(idx) {
                render_card(frame, part, focused && idx == selected, *card_area);
            }
        }
    }
}

fn labeled(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value.to_string()),
    ])
}

/// Body lines of a part card, the title goes on the border
pub fn card_lines(part: &Part) -> Vec<Line<'static>> {
    vec![
        labeled(labels::IMAGE, &part.image_url),
        labeled(labels::BRAND, &part.brand),
        labeled(labels::PRICE, &part.price),
        labeled(labels::LOCATION, &part.location),
        labeled(labels::DATE, &part.date),
        Line::from(vec![
            Span::styled(
                format!("{}: ", labels::LINK),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                part.link.clone(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]),
    ]
}

fn render_card(frame: &mut Frame, part: &Part, is_selected: bool, area: Rect) {
    let border_style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            part.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(Paragraph::new(card_lines(part)).block(block), area);
}

fn render_status_line<R>(frame: &mut Frame, app: &App<R>, area: Rect) {
    let line = match &app.toast {
        Some(toast) => Line::from(Span::styled(
            toast.message.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(Span::styled(
            labels::HELP,
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn spinner_frame(started_at: Instant) -> &'static str {
    const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let elapsed = started_at.elapsed().as_millis() / 80;
    FRAMES[(elapsed as usize) % FRAMES.len()]
}

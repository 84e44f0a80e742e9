use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::input::TextInput;
use crate::tui::state::App;
use crate::tui::table::TableLayout;

const HELP_LINES: &[(&str, &str)] = &[
    ("↑/k ↓/j", "move selection"),
    ("PgUp PgDn", "move a page"),
    ("g/Home G/End", "first / last host"),
    ("/", "search and filter hosts"),
    ("1 2 3 4", "sort by IP, MAC, vendor, hostname"),
    ("", "press again to reverse"),
    ("r", "rescan the network"),
    ("y", "copy IP address"),
    ("m", "copy MAC address"),
    ("h", "copy hostname"),
    ("a", "copy all fields"),
    ("s", "ssh to selected host"),
    ("?", "toggle this help"),
    ("q", "quit"),
];

/// A `width` x `height` rectangle centred in `area`, clipped to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Indexed(63)))
}

fn input_line(input: &TextInput) -> Line<'_> {
    if input.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled(input.placeholder(), Style::default().fg(Color::DarkGray)),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled(input.value(), Style::default().fg(Color::White)),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ])
    }
}

fn render_popup(frame: &mut Frame, area: Rect, block: Block, lines: Vec<Line>) {
    frame.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn render_help(frame: &mut Frame, layout: &TableLayout) {
    let height = HELP_LINES.len() as u16 + 4;
    let area = centered_rect(layout.help_width, height, frame.area());

    let mut lines = vec![Line::from("")];
    lines.extend(HELP_LINES.iter().map(|(keys, action)| {
        Line::from(vec![
            Span::styled(format!("  {:<14}", keys), Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(*action, Style::default().fg(Color::White)),
        ])
    }));

    render_popup(frame, area, popup_block(" Keyboard Shortcuts "), lines);
}

pub fn render_search(frame: &mut Frame, app: &App, layout: &TableLayout) {
    let area = centered_rect(layout.prompt_width, 7, frame.area());
    let lines = vec![
        Line::from(""),
        input_line(app.search_input()),
        Line::from(""),
        Line::from(Span::styled("[enter: apply filter] [esc: cancel]", Style::default().fg(Color::DarkGray))),
    ];
    render_popup(frame, area, popup_block(" Search/Filter Hosts "), lines);
}

pub fn render_remote_login(frame: &mut Frame, app: &App, layout: &TableLayout) {
    let area = centered_rect(layout.prompt_width, 7, frame.area());
    let title = format!(" SSH to {} ", app.selected_target_address().unwrap_or_default());
    let lines = vec![
        Line::from(""),
        input_line(app.username_input()),
        Line::from(""),
        Line::from(Span::styled("[enter: connect] [esc: cancel]", Style::default().fg(Color::DarkGray))),
    ];
    render_popup(frame, area, popup_block(&title), lines);
}

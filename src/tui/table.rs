use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::filter::SortColumn;
use crate::host::HostRecord;
use crate::tui::state::App;

pub const NO_HOSTS_FOUND: &str = "No hosts found";
const KEY_HINTS: &str = "[?: help] [/: search] [1-4: sort] [r: rescan] [y/m/h/a: copy] [s: ssh] [q: quit]";
const SCANNING_INDICATOR: &str = "⏳ Scanning network... ";

/// Share of the table width given to each host column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnWeights {
    pub address: f64,
    pub link_address: f64,
    pub vendor: f64,
    pub hostname: f64,
}

impl Default for ColumnWeights {
    fn default() -> Self {
        Self {
            address: 0.20,
            link_address: 0.27,
            vendor: 0.26,
            hostname: 0.27,
        }
    }
}

/// Fixed sizes used when drawing the dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableLayout {
    pub weights: ColumnWeights,
    pub id_width: u16,
    pub padding_width: u16,
    pub footer_height: u16,
    pub prompt_width: u16,
    pub help_width: u16,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            weights: ColumnWeights::default(),
            id_width: 5,
            padding_width: 8,
            footer_height: 1,
            prompt_width: 50,
            help_width: 56,
        }
    }
}

impl TableLayout {
    /// Column widths for a table `width` cells wide: id column then the four host columns
    pub fn column_widths(&self, width: u16) -> [u16; 5] {
        let remaining = f64::from(width.saturating_sub(self.id_width + self.padding_width));
        let share = |weight: f64| (remaining * weight) as u16;
        [
            self.id_width,
            share(self.weights.address),
            share(self.weights.link_address),
            share(self.weights.vendor),
            share(self.weights.hostname),
        ]
    }

    /// Rows visible in the table body for a terminal `height` cells tall
    pub fn visible_rows(&self, height: u16) -> usize {
        // borders and header row
        usize::from(height.saturating_sub(self.footer_height + 3))
    }
}

/// Column titles, with an arrow on the active sort column
pub fn header_titles(column: SortColumn, ascending: bool) -> [String; 5] {
    let title = |name: &str, this: SortColumn| {
        if column == this && column != SortColumn::None {
            format!("{} {}", name, if ascending { "↑" } else { "↓" })
        } else {
            name.to_string()
        }
    };
    [
        "Id".to_string(),
        title("IP", SortColumn::Address),
        title("MAC", SortColumn::LinkAddress),
        title("Vendor", SortColumn::Vendor),
        title("Hostname", SortColumn::Hostname),
    ]
}

/// Table cells for `hosts`; a single placeholder row when there are none
pub fn build_rows(hosts: &[HostRecord]) -> Vec<[String; 5]> {
    if hosts.is_empty() {
        return vec![[
            "-".to_string(),
            NO_HOSTS_FOUND.to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
        ]];
    }

    hosts
        .iter()
        .map(|host| {
            let [address, link, vendor, hostname] = host.fields();
            [
                host.sequence_id.to_string(),
                address.to_string(),
                link.to_string(),
                vendor.to_string(),
                hostname.to_string(),
            ]
        })
        .collect()
}

pub fn render_hosts(frame: &mut Frame, area: Rect, app: &App, layout: &TableLayout) {
    let (column, ascending) = app.sort();
    log::trace!("[tui::table] render_hosts: rows={} sort={:?} ascending={}", app.rows().len(), column, ascending);

    let header = Row::new(header_titles(column, ascending))
        .style(Style::default().fg(Color::White))
        .bottom_margin(0);

    let rows = build_rows(app.rows()).into_iter().map(Row::new);
    let widths = layout.column_widths(area.width).map(Constraint::Length);

    let block = Block::default()
        .title(format!(" {} ", app.target()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Indexed(229))
                .bg(Color::Indexed(57))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );

    let mut state = TableState::default().with_selected(Some(app.selected()));
    frame.render_stateful_widget(table, area, &mut state);
}

/// Footer line: status message, active filter, scanning indicator and key hints
pub fn footer_text(app: &App) -> String {
    let mut footer = String::new();
    if let Some(status) = app.status_message() {
        footer.push_str(status);
        footer.push_str("  ");
    }
    if !app.filter_query().is_empty() {
        footer.push_str(&format!("[Filter: {}] ", app.filter_query()));
    }
    if app.is_scanning() {
        footer.push_str(SCANNING_INDICATOR);
    }
    footer.push_str(KEY_HINTS);
    footer
}

pub fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let style = if app.is_scanning() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let footer = Paragraph::new(Line::from(Span::styled(footer_text(app), style)));
    frame.render_widget(footer, area);
}

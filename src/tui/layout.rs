use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::tui::popup;
use crate::tui::state::{App, Mode};
use crate::tui::table::{self, TableLayout};

/// Split the screen into the host table and the footer line
pub fn split(area: Rect, layout: &TableLayout) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(layout.footer_height)])
        .split(area);
    (chunks[0], chunks[1])
}

/// Draw the whole dashboard for the current mode.
///
/// The table is always drawn from `App::rows`, which the state machine
/// recomputes on every filter or sort change.
pub fn draw(frame: &mut Frame, app: &App, layout: &TableLayout) {
    let (table_area, footer_area) = split(frame.area(), layout);
    log::trace!("[tui::layout] draw: mode={:?} area={}x{}", app.mode(), frame.area().width, frame.area().height);

    table::render_hosts(frame, table_area, app, layout);
    table::render_footer(frame, footer_area, app);

    match app.mode() {
        Mode::Normal => {}
        Mode::Help => popup::render_help(frame, layout),
        Mode::Search => popup::render_search(frame, app, layout),
        Mode::RemoteLoginPrompt => popup::render_remote_login(frame, app, layout),
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

use crate::filter::{self, SortColumn};
use crate::host::HostRecord;
use crate::tui::clipboard::Clipboard;
use crate::tui::input::TextInput;

const COPY_STATUS_SECS: u64 = 2;
const FILTER_STATUS_SECS: u64 = 3;
const RESCAN_STATUS_SECS: u64 = 3;
const FAILURE_STATUS_SECS: u64 = 5;
const DEFAULT_PAGE_SIZE: usize = 10;
pub const USERNAME_MAX_LEN: usize = 32;

/// Which screen has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Normal,
    Help,
    Search,
    RemoteLoginPrompt,
}

/// Everything the UI loop processes, one at a time
#[derive(Debug, Clone)]
pub enum Message {
    Key(KeyEvent),
    RescanComplete(Vec<HostRecord>),
    RescanFailed(String),
    RemoteLoginFailed(String),
    StatusExpired,
}

/// Side effects requested by the state machine and carried out by the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    Rescan,
    RemoteLogin { username: String, address: String },
    ClearStatusAfter(Duration),
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub expires_at: Instant,
}

impl StatusMessage {
    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
enum CopyField {
    Address,
    LinkAddress,
    Hostname,
    All,
}

impl CopyField {
    fn text(self, host: &HostRecord) -> String {
        match self {
            CopyField::Address => host.address_text().to_string(),
            CopyField::LinkAddress => host.link_address_text().to_string(),
            CopyField::Hostname => host.hostname_text().to_string(),
            CopyField::All => host.fields().join("\t"),
        }
    }

    fn confirmation(self) -> &'static str {
        match self {
            CopyField::Address => "IP copied to clipboard!",
            CopyField::LinkAddress => "MAC address copied to clipboard!",
            CopyField::Hostname => "Hostname copied to clipboard!",
            CopyField::All => "All fields copied to clipboard!",
        }
    }
}

/// Session state of the host dashboard.
///
/// Owned by the UI loop and changed only through [`App::update`]; background
/// work reports back with [`Message`]s instead of touching it.
pub struct App {
    target: String,
    all_hosts: Vec<HostRecord>,
    filtered_hosts: Vec<HostRecord>,
    rows: Vec<HostRecord>,
    selected: usize,
    page_size: usize,
    mode: Mode,
    filter_query: String,
    search_input: TextInput,
    username_input: TextInput,
    sort_column: SortColumn,
    sort_ascending: bool,
    is_scanning: bool,
    status: Option<StatusMessage>,
    selected_target_address: Option<String>,
    clipboard: Box<dyn Clipboard>,
}

impl App {
    pub fn new(hosts: Vec<HostRecord>, target: impl Into<String>, clipboard: Box<dyn Clipboard>) -> Self {
        let target = target.into();
        log::debug!("[tui::state] new: target={} hosts={}", target, hosts.len());

        let mut app = Self {
            target,
            filtered_hosts: hosts.clone(),
            all_hosts: hosts,
            rows: Vec::new(),
            selected: 0,
            page_size: DEFAULT_PAGE_SIZE,
            mode: Mode::Normal,
            filter_query: String::new(),
            search_input: TextInput::new("ip, mac, vendor or hostname"),
            username_input: TextInput::new("username").with_char_limit(USERNAME_MAX_LEN),
            sort_column: SortColumn::None,
            sort_ascending: true,
            is_scanning: false,
            status: None,
            selected_target_address: None,
            clipboard,
        };
        app.rebuild();
        app
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn all_hosts(&self) -> &[HostRecord] {
        &self.all_hosts
    }

    pub fn filtered_hosts(&self) -> &[HostRecord] {
        &self.filtered_hosts
    }

    /// Hosts in display order: filtered, then sorted
    pub fn rows(&self) -> &[HostRecord] {
        &self.rows
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// The highlighted host, or `None` when the placeholder row is shown
    pub fn selected_host(&self) -> Option<&HostRecord> {
        self.rows.get(self.selected)
    }

    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    pub fn search_input(&self) -> &TextInput {
        &self.search_input
    }

    pub fn username_input(&self) -> &TextInput {
        &self.username_input
    }

    pub fn sort(&self) -> (SortColumn, bool) {
        (self.sort_column, self.sort_ascending)
    }

    pub fn is_scanning(&self) -> bool {
        self.is_scanning
    }

    pub fn selected_target_address(&self) -> Option<&str> {
        self.selected_target_address.as_deref()
    }

    /// Status text, if one is set and has not yet expired
    pub fn status_message(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|status| status.is_active(Instant::now()))
            .map(|status| status.text.as_str())
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
    }

    /// Process one message and return the side effects it requires
    pub fn update(&mut self, message: Message) -> Vec<Command> {
        match message {
            Message::StatusExpired => {
                self.expire_status(Instant::now());
                Vec::new()
            }
            Message::RescanComplete(hosts) => self.rescan_complete(hosts),
            Message::RescanFailed(error) => {
                log::warn!("[tui::state] rescan_failed: error={}", error);
                self.is_scanning = false;
                self.set_status(format!("Rescan failed: {}", error), FAILURE_STATUS_SECS)
            }
            Message::RemoteLoginFailed(error) => {
                self.set_status(format!("Remote login failed: {}", error), FAILURE_STATUS_SECS)
            }
            Message::Key(key) => {
                if self.is_scanning {
                    log::trace!("[tui::state] key_ignored_while_scanning: key={:?}", key.code);
                    return Vec::new();
                }
                match self.mode {
                    Mode::Normal => self.handle_normal_key(key),
                    Mode::Help => self.handle_help_key(key),
                    Mode::Search => self.handle_search_key(key),
                    Mode::RemoteLoginPrompt => self.handle_remote_login_key(key),
                }
            }
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) -> Vec<Command> {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
            self.mode = Mode::Normal;
        }
        Vec::new()
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.search_input.clear();
                self.mode = Mode::Normal;
                Vec::new()
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.apply_filter(self.search_input.value().to_string())
            }
            _ => {
                self.search_input.handle_key(key);
                Vec::new()
            }
        }
    }

    fn handle_remote_login_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Esc => {
                self.username_input.clear();
                self.mode = Mode::Normal;
                Vec::new()
            }
            KeyCode::Enter => {
                if self.username_input.is_empty() {
                    return Vec::new();
                }
                let Some(address) = self.selected_target_address.clone() else {
                    self.mode = Mode::Normal;
                    return Vec::new();
                };
                let username = self.username_input.take();
                self.mode = Mode::Normal;
                log::info!("[tui::state] remote_login: target={}@{}", username, address);
                vec![Command::RemoteLogin { username, address }]
            }
            _ => {
                self.username_input.handle_key(key);
                Vec::new()
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Vec<Command> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => vec![Command::Quit],
            KeyCode::Char('q') => vec![Command::Quit],
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
                Vec::new()
            }
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                Vec::new()
            }
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(column) = SortColumn::from_key(c) {
                    self.toggle_sort(column);
                }
                Vec::new()
            }
            KeyCode::Char('r') => self.request_rescan(),
            KeyCode::Char('y') => self.copy(CopyField::Address),
            KeyCode::Char('m') => self.copy(CopyField::LinkAddress),
            KeyCode::Char('h') => self.copy(CopyField::Hostname),
            KeyCode::Char('a') => self.copy(CopyField::All),
            KeyCode::Char('s') => {
                if let Some(address) = self.selected_host().map(|host| host.address_text().to_string()) {
                    self.selected_target_address = Some(address);
                    self.username_input.clear();
                    self.mode = Mode::RemoteLoginPrompt;
                }
                Vec::new()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select(self.selected.saturating_sub(1));
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select(self.selected.saturating_add(1));
                Vec::new()
            }
            KeyCode::PageUp => {
                self.select(self.selected.saturating_sub(self.page_size));
                Vec::new()
            }
            KeyCode::PageDown => {
                self.select(self.selected.saturating_add(self.page_size));
                Vec::new()
            }
            KeyCode::Home | KeyCode::Char('g') => {
                self.select(0);
                Vec::new()
            }
            KeyCode::End | KeyCode::Char('G') => {
                self.select(usize::MAX);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn request_rescan(&mut self) -> Vec<Command> {
        if self.is_scanning {
            return Vec::new();
        }
        log::info!("[tui::state] rescan_requested: target={}", self.target);
        self.is_scanning = true;
        vec![Command::Rescan]
    }

    fn rescan_complete(&mut self, hosts: Vec<HostRecord>) -> Vec<Command> {
        log::info!("[tui::state] rescan_complete: hosts={} filter={:?}", hosts.len(), self.filter_query);
        self.is_scanning = false;
        self.all_hosts = hosts;
        self.filtered_hosts = filter::filter(&self.all_hosts, &self.filter_query).into_owned();
        self.rebuild();
        self.set_status(
            format!("Rescan complete: {} host(s) found", self.all_hosts.len()),
            RESCAN_STATUS_SECS,
        )
    }

    fn apply_filter(&mut self, query: String) -> Vec<Command> {
        self.filter_query = query;
        self.filtered_hosts = filter::filter(&self.all_hosts, &self.filter_query).into_owned();
        self.rebuild();
        self.set_status(format!("Found {} host(s)", self.filtered_hosts.len()), FILTER_STATUS_SECS)
    }

    fn toggle_sort(&mut self, column: SortColumn) {
        if self.sort_column == column {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_column = column;
            self.sort_ascending = true;
        }
        log::debug!("[tui::state] sort: column={:?} ascending={}", self.sort_column, self.sort_ascending);
        self.rebuild();
    }

    fn copy(&mut self, field: CopyField) -> Vec<Command> {
        let Some(text) = self.selected_host().map(|host| field.text(host)) else {
            return Vec::new();
        };
        match self.clipboard.write(&text) {
            Ok(()) => self.set_status(field.confirmation().to_string(), COPY_STATUS_SECS),
            Err(e) => {
                log::debug!("[tui::state] copy_failed: error={}", e);
                Vec::new()
            }
        }
    }

    /// Recompute the displayed rows from `filtered_hosts` and the active sort
    fn rebuild(&mut self) {
        self.rows = filter::sort(&self.filtered_hosts, self.sort_column, self.sort_ascending).into_owned();
        self.select(self.selected);
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.rows.len().saturating_sub(1));
    }

    fn set_status(&mut self, text: String, secs: u64) -> Vec<Command> {
        let duration = Duration::from_secs(secs);
        self.status = Some(StatusMessage {
            text,
            expires_at: Instant::now() + duration,
        });
        vec![Command::ClearStatusAfter(duration)]
    }

    fn expire_status(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|status| !status.is_active(now)) {
            self.status = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingClipboard {
        writes: Rc<RefCell<Vec<String>>>,
    }

    impl Clipboard for RecordingClipboard {
        fn write(&mut self, text: &str) -> Result<()> {
            self.writes.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn write(&mut self, _text: &str) -> Result<()> {
            Err(Error::ClipboardUnavailable("no display".to_string()))
        }
    }

    fn host(id: usize, address: &str, link: &str, vendor: &str, hostname: &str) -> HostRecord {
        HostRecord::new(id)
            .with_address(address)
            .with_link_address(link)
            .with_vendor(vendor)
            .with_hostname(hostname)
    }

    fn sample_hosts() -> Vec<HostRecord> {
        vec![
            host(0, "192.168.1.20", "AA:BB:CC:DD:EE:01", "Apple Inc.", "macbook.local"),
            host(1, "192.168.1.3", "AA:BB:CC:DD:EE:02", "Samsung", "phone.local"),
            host(2, "192.168.1.100", "AA:BB:CC:DD:EE:03", "APPLE INC.", "ipad.local"),
            host(3, "192.168.1.1", "00:11:22:33:44:55", "Router Co", "router.local"),
        ]
    }

    fn app_with(hosts: Vec<HostRecord>) -> (App, Rc<RefCell<Vec<String>>>) {
        let clipboard = RecordingClipboard::default();
        let writes = Rc::clone(&clipboard.writes);
        (App::new(hosts, "192.168.1.0/24", Box::new(clipboard)), writes)
    }

    fn press(app: &mut App, code: KeyCode) -> Vec<Command> {
        app.update(Message::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn addresses(app: &App) -> Vec<&str> {
        app.rows().iter().map(|h| h.address_text()).collect()
    }

    #[test]
    fn test_new_app_defaults() {
        let (app, _) = app_with(sample_hosts());
        assert_eq!(app.mode(), Mode::Normal);
        assert_eq!(app.rows().len(), 4);
        assert_eq!(app.filtered_hosts().len(), 4);
        assert_eq!(app.sort(), (SortColumn::None, true));
        assert!(!app.is_scanning());
        assert!(app.status_message().is_none());
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn test_help_toggle() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.mode(), Mode::Help);

        // Other keys do nothing on the help screen
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.mode(), Mode::Help);
        assert_eq!(app.sort().0, SortColumn::None);

        for dismiss in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('?')] {
            app.mode = Mode::Help;
            let commands = press(&mut app, dismiss);
            assert_eq!(app.mode(), Mode::Normal);
            assert!(commands.is_empty(), "dismiss should not quit");
        }
    }

    #[test]
    fn test_search_apply_filter() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.mode(), Mode::Search);

        type_text(&mut app, "aPPle");
        let commands = press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode(), Mode::Normal);
        assert_eq!(app.filter_query(), "aPPle");
        assert_eq!(addresses(&app), vec!["192.168.1.20", "192.168.1.100"]);
        assert_eq!(app.status_message(), Some("Found 2 host(s)"));
        assert_eq!(commands, vec![Command::ClearStatusAfter(Duration::from_secs(FILTER_STATUS_SECS))]);
    }

    #[test]
    fn test_search_escape_keeps_applied_filter() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "router");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.rows().len(), 1);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "xyz");
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.mode(), Mode::Normal);
        assert!(app.search_input().is_empty());
        assert_eq!(app.filter_query(), "router");
        assert_eq!(app.rows().len(), 1);
    }

    #[test]
    fn test_search_empty_query_clears_filter() {
        let (mut app, _) = app_with(sample_hosts());
        app.apply_filter("samsung".to_string());
        assert_eq!(app.rows().len(), 1);

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.filter_query(), "");
        assert_eq!(app.rows().len(), 4);
    }

    #[test]
    fn test_sort_columns_and_toggle() {
        let (mut app, _) = app_with(sample_hosts());

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.sort(), (SortColumn::Address, true));
        assert_eq!(addresses(&app), vec!["192.168.1.1", "192.168.1.3", "192.168.1.20", "192.168.1.100"]);

        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.sort(), (SortColumn::Address, false));
        assert_eq!(addresses(&app), vec!["192.168.1.100", "192.168.1.20", "192.168.1.3", "192.168.1.1"]);

        press(&mut app, KeyCode::Char('4'));
        assert_eq!(app.sort(), (SortColumn::Hostname, true));
        assert_eq!(app.rows()[0].hostname_text(), "ipad.local");

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.sort(), (SortColumn::LinkAddress, true));
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.sort(), (SortColumn::Vendor, true));
        assert_eq!(app.rows()[0].vendor_text(), "APPLE INC.");
    }

    #[test]
    fn test_sort_does_not_touch_filtered_hosts() {
        let (mut app, _) = app_with(sample_hosts());
        let before = app.filtered_hosts().to_vec();
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.filtered_hosts(), before.as_slice());
    }

    #[test]
    fn test_two_hosts_sorted_by_address() {
        let (mut app, _) = app_with(vec![
            HostRecord::new(0).with_address("10.0.0.20"),
            HostRecord::new(1).with_address("10.0.0.5"),
        ]);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.rows()[0].address_text(), "10.0.0.5");
    }

    #[test]
    fn test_copy_fields() {
        let (mut app, writes) = app_with(sample_hosts());

        let commands = press(&mut app, KeyCode::Char('y'));
        assert_eq!(commands, vec![Command::ClearStatusAfter(Duration::from_secs(COPY_STATUS_SECS))]);
        assert_eq!(app.status_message(), Some("IP copied to clipboard!"));

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.status_message(), Some("MAC address copied to clipboard!"));
        press(&mut app, KeyCode::Char('h'));
        assert_eq!(app.status_message(), Some("Hostname copied to clipboard!"));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.status_message(), Some("All fields copied to clipboard!"));

        assert_eq!(
            *writes.borrow(),
            vec![
                "192.168.1.20".to_string(),
                "AA:BB:CC:DD:EE:01".to_string(),
                "macbook.local".to_string(),
                "192.168.1.20\tAA:BB:CC:DD:EE:01\tApple Inc.\tmacbook.local".to_string(),
            ]
        );
    }

    #[test]
    fn test_copy_follows_selection() {
        let (mut app, writes) = app_with(sample_hosts());
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(writes.borrow().last().map(String::as_str), Some("192.168.1.100"));

        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.selected(), 3);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected(), 3);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.selected(), 0);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected(), 0);
    }

    #[test]
    fn test_copy_on_placeholder_row_is_noop() {
        let (mut app, writes) = app_with(Vec::new());
        for key in ['y', 'm', 'h', 'a'] {
            let commands = press(&mut app, KeyCode::Char(key));
            assert!(commands.is_empty());
        }
        assert!(writes.borrow().is_empty());
        assert!(app.status_message().is_none());
    }

    #[test]
    fn test_copy_failure_is_silent() {
        let mut app = App::new(sample_hosts(), "192.168.1.0/24", Box::new(BrokenClipboard));
        let commands = press(&mut app, KeyCode::Char('y'));
        assert!(commands.is_empty());
        assert!(app.status_message().is_none());
    }

    #[test]
    fn test_remote_login_flow() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.mode(), Mode::RemoteLoginPrompt);
        assert_eq!(app.selected_target_address(), Some("192.168.1.20"));

        // Empty username does nothing
        assert!(press(&mut app, KeyCode::Enter).is_empty());
        assert_eq!(app.mode(), Mode::RemoteLoginPrompt);

        type_text(&mut app, "admin");
        let commands = press(&mut app, KeyCode::Enter);
        assert_eq!(
            commands,
            vec![Command::RemoteLogin {
                username: "admin".to_string(),
                address: "192.168.1.20".to_string(),
            }]
        );
        assert_eq!(app.mode(), Mode::Normal);
        assert!(app.username_input().is_empty());
    }

    #[test]
    fn test_remote_login_escape_discards_username() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('s'));
        type_text(&mut app, "root");
        let commands = press(&mut app, KeyCode::Esc);
        assert!(commands.is_empty());
        assert_eq!(app.mode(), Mode::Normal);
        assert!(app.username_input().is_empty());
    }

    #[test]
    fn test_remote_login_ignored_on_placeholder_row() {
        let (mut app, _) = app_with(Vec::new());
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.mode(), Mode::Normal);
        assert!(app.selected_target_address().is_none());
    }

    #[test]
    fn test_quit_keys() {
        let (mut app, _) = app_with(sample_hosts());
        assert_eq!(press(&mut app, KeyCode::Char('q')), vec![Command::Quit]);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.update(Message::Key(ctrl_c)), vec![Command::Quit]);
    }

    #[test]
    fn test_rescan_trigger() {
        let (mut app, _) = app_with(sample_hosts());
        let commands = press(&mut app, KeyCode::Char('r'));
        assert!(app.is_scanning());
        assert_eq!(commands, vec![Command::Rescan]);
    }

    #[test]
    fn test_rescan_while_scanning_is_noop() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('r'));

        let commands = press(&mut app, KeyCode::Char('r'));
        assert!(commands.is_empty());
        assert!(app.is_scanning());
        assert!(app.request_rescan().is_empty());
    }

    #[test]
    fn test_keys_ignored_while_scanning() {
        let (mut app, writes) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('r'));

        for key in ['q', '/', '?', 's', 'y', '1'] {
            let commands = press(&mut app, KeyCode::Char(key));
            assert!(commands.is_empty(), "key {} produced a command", key);
            assert_eq!(app.mode(), Mode::Normal);
        }
        assert_eq!(app.sort().0, SortColumn::None);
        assert!(writes.borrow().is_empty());
    }

    #[test]
    fn test_rescan_complete() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('r'));

        let new_hosts = vec![
            host(0, "192.168.1.2", "11:22:33:44:55:66", "Rescanned", "test2"),
            host(1, "192.168.1.3", "AA:AA:AA:AA:AA:AA", "New", "test3"),
        ];
        let commands = app.update(Message::RescanComplete(new_hosts));

        assert!(!app.is_scanning());
        assert_eq!(app.all_hosts().len(), 2);
        assert_eq!(app.filtered_hosts().len(), 2);
        assert_eq!(app.status_message(), Some("Rescan complete: 2 host(s) found"));
        assert_eq!(commands, vec![Command::ClearStatusAfter(Duration::from_secs(RESCAN_STATUS_SECS))]);
    }

    #[test]
    fn test_rescan_complete_reapplies_filter_and_sort() {
        let (mut app, _) = app_with(sample_hosts());
        app.apply_filter("Apple".to_string());
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('r'));

        app.update(Message::RescanComplete(vec![
            host(0, "192.168.1.2", "11:22:33:44:55:66", "Apple", "test2"),
            host(1, "192.168.1.3", "AA:AA:AA:AA:AA:AA", "Samsung", "test3"),
        ]));

        assert_eq!(app.filtered_hosts().len(), 1);
        assert_eq!(app.filtered_hosts()[0].vendor_text(), "Apple");
        assert_eq!(app.rows().len(), 1);
        assert_eq!(app.sort(), (SortColumn::Address, true));
    }

    #[test]
    fn test_rescan_complete_clamps_selection() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::End);
        assert_eq!(app.selected(), 3);
        press(&mut app, KeyCode::Char('r'));
        app.update(Message::RescanComplete(vec![HostRecord::new(0).with_address("10.0.0.1")]));
        assert_eq!(app.selected(), 0);

        press(&mut app, KeyCode::Char('r'));
        app.update(Message::RescanComplete(Vec::new()));
        assert!(app.selected_host().is_none());
    }

    #[test]
    fn test_rescan_failed_keeps_hosts() {
        let (mut app, _) = app_with(sample_hosts());
        press(&mut app, KeyCode::Char('r'));

        let commands = app.update(Message::RescanFailed("run scan: network timeout".to_string()));

        assert!(!app.is_scanning());
        assert_eq!(app.all_hosts().len(), 4);
        assert_eq!(app.rows().len(), 4);
        assert_eq!(app.status_message(), Some("Rescan failed: run scan: network timeout"));
        assert_eq!(commands, vec![Command::ClearStatusAfter(Duration::from_secs(FAILURE_STATUS_SECS))]);

        // A new rescan may be issued after a failure
        assert_eq!(press(&mut app, KeyCode::Char('r')), vec![Command::Rescan]);
    }

    #[test]
    fn test_async_messages_processed_in_any_mode() {
        let (mut app, _) = app_with(sample_hosts());
        app.is_scanning = true;
        app.mode = Mode::Help;
        app.update(Message::RescanComplete(Vec::new()));
        assert!(!app.is_scanning());
        assert_eq!(app.mode(), Mode::Help);
    }

    #[test]
    fn test_status_expiry() {
        let (mut app, _) = app_with(sample_hosts());
        app.status = Some(StatusMessage {
            text: "Current message".to_string(),
            expires_at: Instant::now() + Duration::from_secs(3),
        });

        // Not yet expired: a stale tick from an earlier message leaves it alone
        app.update(Message::StatusExpired);
        assert_eq!(app.status_message(), Some("Current message"));

        app.status = Some(StatusMessage {
            text: "Expired message".to_string(),
            expires_at: Instant::now() - Duration::from_secs(1),
        });
        assert!(app.status_message().is_none());
        app.update(Message::StatusExpired);
        assert!(app.status.is_none());
    }

    #[test]
    fn test_remote_login_failure_sets_status() {
        let (mut app, _) = app_with(sample_hosts());
        let commands = app.update(Message::RemoteLoginFailed("ssh not found".to_string()));
        assert_eq!(app.status_message(), Some("Remote login failed: ssh not found"));
        assert_eq!(commands.len(), 1);
    }
}

pub mod clipboard;
pub mod input;
pub mod layout;
pub mod popup;
pub mod state;
pub mod table;

pub use clipboard::{Clipboard, SystemClipboard};
pub use state::{App, Command, Message, Mode};
pub use table::{ColumnWeights, TableLayout};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::process::Command as Process;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::host::HostRecord;
use crate::progress::Silent;
use crate::scanner::Orchestrator;

const TICK_RATE_MS: u64 = 250;

pub type Tui = Terminal<CrosstermBackend<io::Stdout>>;

/// Event loop around the dashboard state machine.
///
/// Keys and background results are fed to [`App::update`] one at a time on
/// this thread; rescans and status timers run as tokio tasks and report back
/// over a channel.
pub struct TuiApp {
    app: App,
    config: Config,
    orchestrator: Arc<Orchestrator>,
    layout: TableLayout,
    runtime: Handle,
    tx: UnboundedSender<Message>,
    rx: UnboundedReceiver<Message>,
    should_quit: bool,
    tick_rate: Duration,
}

impl TuiApp {
    /// Must be called from within a tokio runtime
    pub fn new(hosts: Vec<HostRecord>, config: Config, orchestrator: Arc<Orchestrator>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(hosts, config.target.clone(), Box::new(SystemClipboard::new()));
        Self {
            app,
            config,
            orchestrator,
            layout: TableLayout::default(),
            runtime: Handle::current(),
            tx,
            rx,
            should_quit: false,
            tick_rate: Duration::from_millis(TICK_RATE_MS),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run until the user quits
    pub fn run(mut self, terminal: &mut Tui) -> io::Result<()> {
        let mut last_tick = Instant::now();
        self.resize(terminal.size()?.height);

        loop {
            terminal.draw(|f| layout::draw(f, &self.app, &self.layout))?;

            let timeout = self.tick_rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.dispatch(Message::Key(key), terminal)?;
                    }
                    Event::Resize(_, height) => self.resize(height),
                    _ => {}
                }
            }

            while let Ok(message) = self.rx.try_recv() {
                self.dispatch(message, terminal)?;
            }

            if self.should_quit {
                log::info!("[tui] quit");
                break;
            }

            if last_tick.elapsed() >= self.tick_rate {
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    fn resize(&mut self, height: u16) {
        self.app.set_page_size(self.layout.visible_rows(height));
    }

    fn dispatch(&mut self, message: Message, terminal: &mut Tui) -> io::Result<()> {
        for command in self.app.update(message) {
            self.execute(command, terminal)?;
        }
        Ok(())
    }

    fn execute(&mut self, command: Command, terminal: &mut Tui) -> io::Result<()> {
        log::debug!("[tui] execute: command={:?}", command);
        match command {
            Command::Quit => self.should_quit = true,
            Command::Rescan => {
                spawn_rescan(
                    &self.runtime,
                    Arc::clone(&self.orchestrator),
                    self.config.target.clone(),
                    self.config.timeout,
                    self.tx.clone(),
                );
            }
            Command::ClearStatusAfter(delay) => {
                let tx = self.tx.clone();
                self.runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(Message::StatusExpired);
                });
            }
            Command::RemoteLogin { username, address } => {
                if let Err(e) = self.remote_login(terminal, &username, &address)? {
                    log::error!("[tui] remote_login_failed: target={}@{} error={}", username, address, e);
                    let message = Message::RemoteLoginFailed(e.to_string());
                    for command in self.app.update(message) {
                        self.execute(command, terminal)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Hand the terminal to the remote login command, then take it back.
    ///
    /// The outer error means the terminal could not be resumed; the inner one
    /// is a login that did not run.
    fn remote_login(&mut self, terminal: &mut Tui, username: &str, address: &str) -> io::Result<io::Result<()>> {
        log::info!("[tui] remote_login: command={} target={}@{}", self.config.ssh_command, username, address);

        let ssh_command = &self.config.ssh_command;
        suspended(terminal, restore_terminal, resume_terminal, || {
            let status = Process::new(ssh_command)
                .arg(format!("{}@{}", username, address))
                .status()?;
            log::info!("[tui] remote_login_exited: status={}", status);
            Ok(())
        })
    }
}

/// Run `child` between `suspend` and `resume`.
///
/// `child` only runs once `suspend` succeeded, and `resume` runs on every path.
fn suspended<S, T>(
    state: &mut S,
    suspend: impl FnOnce(&mut S) -> io::Result<()>,
    resume: impl FnOnce(&mut S) -> io::Result<()>,
    child: impl FnOnce() -> io::Result<T>,
) -> io::Result<io::Result<T>> {
    let outcome = suspend(state).and_then(|()| child());
    resume(state)?;
    Ok(outcome)
}

/// Run a rescan on `runtime` and report the outcome on `tx`.
///
/// Every failure, a cancelled scan included, arrives as `RescanFailed`.
pub fn spawn_rescan(
    runtime: &Handle,
    orchestrator: Arc<Orchestrator>,
    target: String,
    timeout: Duration,
    tx: UnboundedSender<Message>,
) -> JoinHandle<()> {
    runtime.spawn(async move {
        // Nothing may draw over the TUI while it is running
        let mut progress = Silent;
        let message = match orchestrator.scan(&target, timeout, &mut progress).await {
            Ok(hosts) => Message::RescanComplete(hosts),
            Err(e) => Message::RescanFailed(e.to_string()),
        };
        if tx.send(message).is_err() {
            log::debug!("[tui] rescan_result_dropped: ui loop has exited");
        }
    })
}

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> io::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal after TUI mode
pub fn restore_terminal(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Re-enter TUI mode after a suspended child process
fn resume_terminal(terminal: &mut Tui) -> io::Result<()> {
    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;
    Ok(())
}

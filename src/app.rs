use eyre::{Result, WrapErr};
use std::sync::Arc;

use crate::config::Config;
use crate::progress::{ProgressReporter, Silent, Spinner};
use crate::scanner::{Discovery, Orchestrator};
use crate::tui::{self, TuiApp};

/// Validate the configuration, run the initial scan and hand its results to the dashboard.
///
/// A failed initial scan ends the session: there is nothing to show yet.
pub async fn run(config: Config, discovery: Arc<dyn Discovery>) -> Result<()> {
    config.validate().wrap_err("invalid configuration")?;

    let orchestrator = Arc::new(Orchestrator::new(discovery));
    let mut progress: Box<dyn ProgressReporter> = if config.show_progress {
        Box::new(Spinner::new())
    } else {
        Box::new(Silent)
    };

    let hosts = orchestrator
        .scan(&config.target, config.timeout, progress.as_mut())
        .await
        .wrap_err("scan network")?;
    log::info!("[app] initial_scan_complete: target={} hosts={}", config.target, hosts.len());

    let mut terminal = tui::init_terminal().wrap_err("initialize terminal")?;
    let result = TuiApp::new(hosts, config, orchestrator).run(&mut terminal);
    tui::restore_terminal(&mut terminal).wrap_err("restore terminal")?;

    result.wrap_err("run ui")
}

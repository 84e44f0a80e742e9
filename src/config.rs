use ipnetwork::IpNetwork;
use std::time::Duration;

use crate::cli::Cli;
use crate::error::{Error, Result};

pub const DEFAULT_TARGET: &str = "192.168.1.0/24";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_SSH_COMMAND: &str = "ssh";

/// Settings for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Network range to scan, e.g. `192.168.1.0/24`
    pub target: String,
    /// Upper bound on a single scan
    pub timeout: Duration,
    /// Show the spinner during the initial scan
    pub show_progress: bool,
    /// Program launched for remote login
    pub ssh_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            show_progress: true,
            ssh_command: DEFAULT_SSH_COMMAND.to_string(),
        }
    }
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            target: cli.target.clone(),
            timeout: Duration::from_secs(cli.timeout),
            show_progress: !cli.no_progress,
            ssh_command: cli.ssh_command.clone(),
        }
    }
}

impl Config {
    /// Reject malformed target ranges and a zero timeout
    pub fn validate(&self) -> Result<()> {
        if !self.target.contains('/') {
            return Err(Error::InvalidTarget {
                target: self.target.clone(),
                reason: "missing prefix length".to_string(),
            });
        }

        self.target
            .parse::<IpNetwork>()
            .map_err(|e| Error::InvalidTarget {
                target: self.target.clone(),
                reason: e.to_string(),
            })?;

        if self.timeout.is_zero() {
            return Err(Error::InvalidTimeout(self.timeout));
        }

        Ok(())
    }
}

use clap::Parser;

use crate::config::{DEFAULT_SSH_COMMAND, DEFAULT_TARGET, DEFAULT_TIMEOUT_SECS};

#[derive(Parser, Debug)]
#[command(name = "nls")]
#[command(about = "Discover live hosts on the local network and browse them in a terminal dashboard")]
pub struct Cli {
    /// Network range to scan in CIDR notation
    #[arg(default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Give up on a scan after this many seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Do not show the progress spinner during the initial scan
    #[arg(long)]
    pub no_progress: bool,

    /// Command used for remote login, invoked as `<cmd> user@address`
    #[arg(long, default_value = DEFAULT_SSH_COMMAND)]
    pub ssh_command: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}

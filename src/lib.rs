pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod host;
pub mod logging;
pub mod progress;
pub mod scan;
pub mod scanner;
pub mod tui;

// Re-export key types and functions at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use filter::{compare_addresses, filter, sort, SortColumn};
pub use host::HostRecord;
pub use logging::{get_log_file_path, init_logging};
pub use progress::{ProgressReporter, Silent, Spinner};
pub use scan::{default_discovery, NmapDiscovery};
pub use scanner::{Discovery, DiscoveryRun, Orchestrator, ScanTask, TaskPoll};
pub use tui::{init_terminal, restore_terminal, App, TuiApp};

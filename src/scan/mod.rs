pub mod nmap;

pub use nmap::NmapDiscovery;

use crate::scanner::Discovery;
use std::sync::Arc;

/// The discovery backend used when none is injected
pub fn default_discovery() -> Arc<dyn Discovery> {
    Arc::new(NmapDiscovery::default())
}

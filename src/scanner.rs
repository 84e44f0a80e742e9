use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{Error, Result};
use crate::host::{present, HostRecord};
use crate::progress::ProgressReporter;

const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
const SCAN_MESSAGE: &str = "Scanning network...";

/// Kind of address reported for a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Ipv4,
    Ipv6,
    Mac,
    Other,
}

impl AddressKind {
    pub fn parse(kind: &str) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "ipv4" => AddressKind::Ipv4,
            "ipv6" => AddressKind::Ipv6,
            "mac" => AddressKind::Mac,
            _ => AddressKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAddress {
    pub value: String,
    pub kind: AddressKind,
    pub vendor: Option<String>,
}

/// One device as reported by a discovery backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Device {
    pub addresses: Vec<DeviceAddress>,
    pub names: Vec<String>,
}

/// Raw output of one discovery run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryRun {
    pub devices: Vec<Device>,
    pub warnings: Vec<String>,
}

/// A capability that probes a target range and reports the devices it found
#[async_trait]
pub trait Discovery: Send + Sync {
    /// Backend identifier for logging
    fn name(&self) -> &'static str;

    /// Probe the target range. Construction failures map to
    /// `DiscoveryBackendUnavailable`, run failures to `DiscoveryExecutionFailed`.
    async fn discover(&self, target: &str) -> Result<DiscoveryRun>;
}

/// Outcome of a non-blocking check on a running task
#[derive(Debug)]
pub enum TaskPoll<T> {
    Pending,
    Done(T),
}

/// A discovery run executing on its own tokio task.
///
/// The result travels over a oneshot channel, which buffers its single value,
/// so a worker that finishes after the caller has given up never blocks.
pub struct ScanTask {
    rx: oneshot::Receiver<Result<DiscoveryRun>>,
    handle: JoinHandle<()>,
}

impl ScanTask {
    pub fn spawn(discovery: Arc<dyn Discovery>, target: String) -> Self {
        log::debug!("[scanner] spawn: backend={} target={}", discovery.name(), target);
        let (tx, rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            let result = discovery.discover(&target).await;
            if tx.send(result).is_err() {
                log::debug!("[scanner] result_discarded: backend={} target={}", discovery.name(), target);
            }
        });
        Self { rx, handle }
    }

    pub fn poll(&mut self) -> TaskPoll<Result<DiscoveryRun>> {
        match self.rx.try_recv() {
            Ok(result) => TaskPoll::Done(result),
            Err(TryRecvError::Empty) => TaskPoll::Pending,
            Err(TryRecvError::Closed) => TaskPoll::Done(Err(Error::DiscoveryExecutionFailed(
                "discovery worker exited without a result".to_string(),
            ))),
        }
    }

    /// Stop waiting for the worker. Dropping the backend future kills any child process it owns.
    pub fn abandon(&self) {
        self.handle.abort();
    }
}

/// Runs a single discovery operation under a deadline and turns its output into host records
pub struct Orchestrator {
    discovery: Arc<dyn Discovery>,
    poll_interval: Duration,
}

impl Orchestrator {
    pub fn new(discovery: Arc<dyn Discovery>) -> Self {
        Self {
            discovery,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Scan `target`, giving up once `deadline` has elapsed.
    ///
    /// The progress reporter sees `start` once, `tick` once per poll and
    /// `finish` exactly once whichever way the scan ends.
    pub async fn scan(
        &self,
        target: &str,
        deadline: Duration,
        progress: &mut dyn ProgressReporter,
    ) -> Result<Vec<HostRecord>> {
        log::info!("[scanner] scan_starting: backend={} target={} deadline={}s",
            self.discovery.name(), target, deadline.as_secs());

        progress.start(SCAN_MESSAGE);
        let started = Instant::now();
        // A deadline too far out to represent never expires
        let expires_at = started.checked_add(deadline);
        let mut task = ScanTask::spawn(Arc::clone(&self.discovery), target.to_string());
        let mut polls = 0u64;

        let outcome = loop {
            if let TaskPoll::Done(result) = task.poll() {
                break result;
            }
            if expires_at.is_some_and(|at| Instant::now() >= at) {
                task.abandon();
                log::warn!("[scanner] scan_cancelled: target={} elapsed={}ms",
                    target, started.elapsed().as_millis());
                break Err(Error::ScanCancelled(deadline));
            }
            progress.tick();
            polls += 1;
            tokio::time::sleep(self.poll_interval).await;
        };
        progress.finish();

        let run = match outcome {
            Ok(run) => run,
            Err(e) => {
                log::error!("[scanner] scan_failed: target={} polls={} error={}", target, polls, e);
                return Err(e);
            }
        };

        for warning in &run.warnings {
            log::warn!("[scanner] run finished with warnings: {}", warning);
        }

        let hosts = translate(run);
        log::info!("[scanner] scan_completed: target={} hosts={} duration={}ms",
            target, hosts.len(), started.elapsed().as_millis());
        Ok(hosts)
    }
}

/// Convert raw discovery output to host records.
///
/// The first address is the primary address, the second the link address with
/// its vendor, and the first name the hostname. Order is kept and nothing is
/// deduplicated.
pub fn translate(run: DiscoveryRun) -> Vec<HostRecord> {
    run.devices
        .into_iter()
        .enumerate()
        .map(|(sequence_id, device)| {
            let mut host = HostRecord::new(sequence_id);
            let mut addresses = device.addresses.into_iter();
            if let Some(primary) = addresses.next() {
                host.address = present(primary.value);
            }
            if let Some(link) = addresses.next() {
                host.link_address = present(link.value);
                host.vendor = link.vendor.and_then(present);
            }
            host.hostname = device.names.into_iter().next().and_then(present);
            host
        })
        .collect()
}

use async_trait::async_trait;
use regex::Regex;
use std::io::ErrorKind;
use std::sync::LazyLock;
use std::time::Instant;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::scanner::{AddressKind, Device, DeviceAddress, Discovery, DiscoveryRun};

const DEFAULT_NMAP_BINARY: &str = "nmap";

static HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<host\b[^>]*>(.*?)</host>").expect("host pattern"));
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<address\s([^>]*?)/?>").expect("address pattern"));
static HOSTNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<hostname\s([^>]*?)/?>").expect("hostname pattern"));
static FINISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<finished\s([^>]*?)/?>").expect("finished pattern"));
static ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w:-]+)\s*=\s*"([^"]*)""#).expect("attribute pattern"));

/// Discovery backend that runs an nmap ping scan (`-sn`) and reads its XML report
pub struct NmapDiscovery {
    binary: String,
}

impl NmapDiscovery {
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_NMAP_BINARY)
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        let binary = binary.into();
        log::debug!("[scan::nmap] new: binary={}", binary);
        Self { binary }
    }

    fn args(target: &str) -> [&str; 4] {
        ["-sn", "-oX", "-", target]
    }
}

impl Default for NmapDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Discovery for NmapDiscovery {
    fn name(&self) -> &'static str {
        "nmap"
    }

    async fn discover(&self, target: &str) -> Result<DiscoveryRun> {
        log::debug!("[scan::nmap] discover: binary={} target={}", self.binary, target);

        let command_start = Instant::now();
        let output = Command::new(&self.binary)
            .args(Self::args(target))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                log::error!("[scan::nmap] command_spawn_failed: binary={} error={}", self.binary, e);
                match e.kind() {
                    ErrorKind::NotFound => Error::DiscoveryBackendUnavailable(format!(
                        "{} not found in PATH", self.binary
                    )),
                    _ => Error::DiscoveryBackendUnavailable(format!("{}: {}", self.binary, e)),
                }
            })?;

        log::trace!("[scan::nmap] command_completed: target={} duration={}ms status={}",
            target, command_start.elapsed().as_millis(), output.status);

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            log::error!("[scan::nmap] command_unsuccessful: target={} status={} stderr={}",
                target, output.status, stderr.trim());
            let detail = match stderr.trim() {
                "" => format!("nmap exited with {}", output.status),
                text => text.to_string(),
            };
            return Err(Error::DiscoveryExecutionFailed(detail));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut run = parse_report(&stdout)?;
        run.warnings.extend(stderr_warnings(&stderr));

        log::debug!("[scan::nmap] report_parsed: target={} devices={} warnings={}",
            target, run.devices.len(), run.warnings.len());
        Ok(run)
    }
}

/// Non-empty stderr lines of a successful run
fn stderr_warnings(stderr: &str) -> Vec<String> {
    stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read an nmap XML report, keeping every `<host>` in document order
pub fn parse_report(xml: &str) -> Result<DiscoveryRun> {
    if !xml.contains("<nmaprun") {
        return Err(Error::DiscoveryExecutionFailed(
            "unrecognized nmap output: missing <nmaprun> report".to_string(),
        ));
    }

    if let Some(finished) = FINISHED_RE.captures(xml) {
        let attrs = &finished[1];
        if attribute(attrs, "exit").as_deref() == Some("error") {
            let message = attribute(attrs, "errormsg").unwrap_or_else(|| "nmap reported an error".to_string());
            return Err(Error::DiscoveryExecutionFailed(message));
        }
    }

    let devices = HOST_RE
        .captures_iter(xml)
        .map(|host| parse_host(&host[1]))
        .collect();

    Ok(DiscoveryRun {
        devices,
        warnings: Vec::new(),
    })
}

fn parse_host(body: &str) -> Device {
    let addresses = ADDRESS_RE
        .captures_iter(body)
        .filter_map(|cap| {
            let attrs = &cap[1];
            let value = attribute(attrs, "addr")?;
            Some(DeviceAddress {
                value,
                kind: AddressKind::parse(&attribute(attrs, "addrtype").unwrap_or_default()),
                vendor: attribute(attrs, "vendor"),
            })
        })
        .collect();

    let names = HOSTNAME_RE
        .captures_iter(body)
        .filter_map(|cap| attribute(&cap[1], "name"))
        .collect();

    Device { addresses, names }
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    ATTR_RE
        .captures_iter(attrs)
        .find(|cap| &cap[1] == name)
        .map(|cap| decode_entities(&cap[2]))
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Text shown in place of a field the scan could not determine
pub const MISSING: &str = "none";

/// One discovered device, as seen by a single scan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostRecord {
    /// Position in discovery order, reassigned on every scan
    pub sequence_id: usize,
    pub address: Option<String>,
    pub link_address: Option<String>,
    pub vendor: Option<String>,
    pub hostname: Option<String>,
}

impl HostRecord {
    pub fn new(sequence_id: usize) -> Self {
        Self {
            sequence_id,
            ..Self::default()
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = present(address.into());
        self
    }

    pub fn with_link_address(mut self, link_address: impl Into<String>) -> Self {
        self.link_address = present(link_address.into());
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = present(vendor.into());
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = present(hostname.into());
        self
    }

    pub fn address_text(&self) -> &str {
        display(&self.address)
    }

    pub fn link_address_text(&self) -> &str {
        display(&self.link_address)
    }

    pub fn vendor_text(&self) -> &str {
        display(&self.vendor)
    }

    pub fn hostname_text(&self) -> &str {
        display(&self.hostname)
    }

    /// All four descriptive fields as displayed, in column order
    pub fn fields(&self) -> [&str; 4] {
        [
            self.address_text(),
            self.link_address_text(),
            self.vendor_text(),
            self.hostname_text(),
        ]
    }
}

/// Empty strings are treated as absent so the display never shows a blank cell
pub(crate) fn present(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn display(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(MISSING)
}

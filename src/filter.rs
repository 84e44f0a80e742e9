use std::borrow::Cow;
use std::cmp::Ordering;

use crate::host::HostRecord;

const OCTET_COUNT: usize = 4;

/// Column the host table is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    None,
    Address,
    LinkAddress,
    Vendor,
    Hostname,
}

impl SortColumn {
    /// Map the `1`..`4` column keys to a column
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(SortColumn::Address),
            '2' => Some(SortColumn::LinkAddress),
            '3' => Some(SortColumn::Vendor),
            '4' => Some(SortColumn::Hostname),
            _ => None,
        }
    }

    fn field(self, host: &HostRecord) -> Option<&str> {
        match self {
            SortColumn::None => None,
            SortColumn::Address => host.address.as_deref(),
            SortColumn::LinkAddress => host.link_address.as_deref(),
            SortColumn::Vendor => host.vendor.as_deref(),
            SortColumn::Hostname => host.hostname.as_deref(),
        }
    }
}

/// Hosts where any displayed field contains `query`, ignoring case.
///
/// An empty query borrows the input unchanged.
pub fn filter<'a>(hosts: &'a [HostRecord], query: &str) -> Cow<'a, [HostRecord]> {
    if query.is_empty() {
        return Cow::Borrowed(hosts);
    }

    let query = query.to_lowercase();
    let matched: Vec<HostRecord> = hosts
        .iter()
        .filter(|host| {
            host.fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
        })
        .cloned()
        .collect();

    log::debug!("[filter] filter: query={} total={} matched={}", query, hosts.len(), matched.len());
    Cow::Owned(matched)
}

/// Stable sort by `column`. Descending inverts the comparator, so equal keys
/// keep their input order in both directions.
pub fn sort<'a>(hosts: &'a [HostRecord], column: SortColumn, ascending: bool) -> Cow<'a, [HostRecord]> {
    if column == SortColumn::None || hosts.is_empty() {
        return Cow::Borrowed(hosts);
    }

    let mut sorted = hosts.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = compare(column, a, b);
        if ascending { ordering } else { ordering.reverse() }
    });
    Cow::Owned(sorted)
}

fn compare(column: SortColumn, a: &HostRecord, b: &HostRecord) -> Ordering {
    let (a, b) = (column.field(a), column.field(b));
    match column {
        SortColumn::Address => compare_addresses(a, b),
        _ => compare_missing_last(a, b, |a, b| a.cmp(b)),
    }
}

/// Numeric per-octet comparison of dotted-quad addresses.
///
/// Missing addresses sort after every present one. If an octet is not a
/// number the whole strings are compared instead.
pub fn compare_addresses(a: Option<&str>, b: Option<&str>) -> Ordering {
    compare_missing_last(a, b, |a, b| {
        for (x, y) in a.split('.').zip(b.split('.')).take(OCTET_COUNT) {
            match (x.parse::<u32>(), y.parse::<u32>()) {
                (Ok(x), Ok(y)) if x != y => return x.cmp(&y),
                (Ok(_), Ok(_)) => continue,
                _ => return a.cmp(b),
            }
        }
        Ordering::Equal
    })
}

fn compare_missing_last<F>(a: Option<&str>, b: Option<&str>, present: F) -> Ordering
where
    F: Fn(&str, &str) -> Ordering,
{
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => present(a, b),
    }
}

//! ASN sources for IPv6 grouping.

use std::net::Ipv6Addr;

use crate::domain::{AsnLookupError, DiversityError, Ipv6Cidr};
use crate::ports::AsnLookup;

/// Lookup that never knows an ASN.
///
/// Every native IPv6 peer falls into the single unknown-ASN group.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAsnLookup;

impl AsnLookup for NoAsnLookup {
    fn asn_for_ipv6(&self, _ip: &Ipv6Addr) -> Result<Option<String>, AsnLookupError> {
        Ok(None)
    }
}

/// Prefix-to-ASN table with longest-prefix match.
///
/// Entries are kept sorted by descending prefix length, so the first match
/// is the most specific one.
#[derive(Debug, Clone, Default)]
pub struct StaticAsnTable {
    entries: Vec<(Ipv6Cidr, String)>,
}

impl StaticAsnTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `prefix` (e.g. `"2001:db8::/32"`) to `asn`.
    ///
    /// Re-inserting an existing prefix replaces its ASN.
    pub fn insert(&mut self, prefix: &str, asn: impl Into<String>) -> Result<(), DiversityError> {
        let cidr: Ipv6Cidr = prefix.parse()?;
        let asn = asn.into();
        if asn.is_empty() {
            return Err(DiversityError::Configuration(format!(
                "empty ASN for prefix {}",
                cidr
            )));
        }

        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == cidr) {
            entry.1 = asn;
            return Ok(());
        }

        self.entries.push((cidr, asn));
        self.entries.sort_by(|a, b| b.0.prefix_len().cmp(&a.0.prefix_len()));
        Ok(())
    }

    /// Build a table from `(prefix, asn)` pairs.
    pub fn from_entries<I, P, A>(entries: I) -> Result<Self, DiversityError>
    where
        I: IntoIterator<Item = (P, A)>,
        P: AsRef<str>,
        A: Into<String>,
    {
        let mut table = Self::new();
        for (prefix, asn) in entries {
            table.insert(prefix.as_ref(), asn)?;
        }
        Ok(table)
    }

    /// Number of prefixes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no prefix is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AsnLookup for StaticAsnTable {
    fn asn_for_ipv6(&self, ip: &Ipv6Addr) -> Result<Option<String>, AsnLookupError> {
        Ok(self
            .entries
            .iter()
            .find(|(cidr, _)| cidr.contains(ip))
            .map(|(_, asn)| asn.clone()))
    }
}

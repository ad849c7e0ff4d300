//! Per-CPL and per-table group limits.
//!
//! The standard routing-table policy. Limits count group entries, one per
//! admitted address: at most `max_per_cpl` entries of one IP group in any
//! bucket and at most `max_for_table` in the whole table.
//!
//! `allow` sees only counts already committed. A peer with several addresses
//! in one group is checked once per address against the same count, so its
//! admission can take the group past the limit by its extra entries.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{
    DiversityConfig, DiversityError, NodeId, PeerAddress, PeerGroupInfo, PeerIpGroupKey,
};
use crate::ports::{AddressBook, GroupingPolicy};

#[derive(Debug, Default)]
struct GroupCounts {
    per_cpl: HashMap<u32, HashMap<PeerIpGroupKey, usize>>,
    per_table: HashMap<PeerIpGroupKey, usize>,
}

/// [`GroupingPolicy`] enforcing [`DiversityConfig`] limits.
pub struct GroupLimitPolicy {
    config: DiversityConfig,
    address_book: Arc<dyn AddressBook>,
    counts: RwLock<GroupCounts>,
}

impl GroupLimitPolicy {
    /// Create a policy.
    ///
    /// # Errors
    ///
    /// `DiversityError::Configuration` if the limits fail validation.
    pub fn new(
        config: DiversityConfig,
        address_book: Arc<dyn AddressBook>,
    ) -> Result<Self, DiversityError> {
        config.validate()?;
        Ok(Self {
            config,
            address_book,
            counts: RwLock::new(GroupCounts::default()),
        })
    }

    /// Active limits.
    pub fn config(&self) -> &DiversityConfig {
        &self.config
    }

    /// Peers of `key` across the whole table.
    pub fn group_count(&self, key: &PeerIpGroupKey) -> usize {
        self.counts.read().per_table.get(key).copied().unwrap_or(0)
    }

    /// Peers of `key` in bucket `cpl`.
    pub fn cpl_group_count(&self, cpl: u32, key: &PeerIpGroupKey) -> usize {
        self.counts
            .read()
            .per_cpl
            .get(&cpl)
            .and_then(|groups| groups.get(key))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct groups with at least one peer.
    pub fn tracked_groups(&self) -> usize {
        self.counts.read().per_table.len()
    }
}

impl GroupingPolicy for GroupLimitPolicy {
    fn allow(&self, group: &PeerGroupInfo) -> bool {
        let counts = self.counts.read();
        let key = &group.ip_group_key;

        if counts.per_table.get(key).copied().unwrap_or(0) >= self.config.max_for_table {
            debug!(group = %key, "table limit reached for group");
            return false;
        }

        let in_bucket = counts
            .per_cpl
            .get(&group.cpl)
            .and_then(|groups| groups.get(key))
            .copied()
            .unwrap_or(0);
        if in_bucket >= self.config.max_per_cpl {
            debug!(group = %key, cpl = group.cpl, "bucket limit reached for group");
            return false;
        }

        true
    }

    fn increment(&self, group: &PeerGroupInfo) {
        let mut counts = self.counts.write();
        let key = &group.ip_group_key;

        *counts.per_table.entry(key.clone()).or_insert(0) += 1;
        *counts
            .per_cpl
            .entry(group.cpl)
            .or_default()
            .entry(key.clone())
            .or_insert(0) += 1;
    }

    fn decrement(&self, group: &PeerGroupInfo) {
        let mut counts = self.counts.write();
        let key = &group.ip_group_key;

        if let Some(n) = counts.per_table.get_mut(key) {
            *n = n.saturating_sub(1);
            if *n == 0 {
                counts.per_table.remove(key);
            }
        }

        if let Some(groups) = counts.per_cpl.get_mut(&group.cpl) {
            if let Some(n) = groups.get_mut(key) {
                *n = n.saturating_sub(1);
                if *n == 0 {
                    groups.remove(key);
                }
            }
            if groups.is_empty() {
                counts.per_cpl.remove(&group.cpl);
            }
        }
    }

    fn peer_addresses(&self, peer: &NodeId) -> Vec<PeerAddress> {
        self.address_book.addresses_of(peer)
    }
}

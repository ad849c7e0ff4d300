//! Bookkeeping guarded by the filter lock.

use std::collections::{HashMap, HashSet};

use crate::domain::{CplDiversityStats, NodeId, PeerGroupInfo, PeerIpGroupKey};

/// All mutable filter state, held behind one `Mutex`.
///
/// # Invariants
/// - A peer is in `peer_groups` iff it was admitted and not yet removed.
/// - A peer in `peer_groups` appears in `cpl_peer_groups` under the CPL of
///   each of its groups, and no CPL bucket is ever empty.
/// - Whitelisting never adds a peer to either map.
#[derive(Debug, Default)]
pub(crate) struct FilterState {
    pub(crate) peer_groups: HashMap<NodeId, Vec<PeerGroupInfo>>,
    pub(crate) cpl_peer_groups: HashMap<u32, HashMap<NodeId, Vec<PeerIpGroupKey>>>,
    pub(crate) whitelist: HashSet<NodeId>,
}

impl FilterState {
    /// Record an admitted peer under `cpl`.
    pub(crate) fn commit(&mut self, peer: NodeId, cpl: u32, groups: Vec<PeerGroupInfo>) {
        let keys = self
            .cpl_peer_groups
            .entry(cpl)
            .or_default()
            .entry(peer)
            .or_default();
        keys.extend(groups.iter().map(|g| g.ip_group_key.clone()));

        self.peer_groups.entry(peer).or_default().extend(groups);
    }

    /// Drop a peer from both maps, returning the groups it held.
    ///
    /// Clears the peer from bucket `cpl` and from every bucket its groups
    /// were recorded under. Buckets left empty are removed.
    pub(crate) fn release(&mut self, peer: &NodeId, cpl: u32) -> Vec<PeerGroupInfo> {
        let groups = self.peer_groups.remove(peer).unwrap_or_default();

        let mut buckets: Vec<u32> = groups.iter().map(|g| g.cpl).collect();
        buckets.push(cpl);
        buckets.sort_unstable();
        buckets.dedup();

        for bucket_cpl in buckets {
            if let Some(bucket) = self.cpl_peer_groups.get_mut(&bucket_cpl) {
                bucket.remove(peer);
                if bucket.is_empty() {
                    self.cpl_peer_groups.remove(&bucket_cpl);
                }
            }
        }

        groups
    }

    /// Deep copy of every non-empty bucket, ascending by CPL.
    pub(crate) fn snapshot(&self) -> Vec<CplDiversityStats> {
        let mut stats: Vec<CplDiversityStats> = self
            .cpl_peer_groups
            .iter()
            .filter(|(_, peers)| !peers.is_empty())
            .map(|(cpl, peers)| CplDiversityStats {
                cpl: *cpl,
                peers: peers.clone(),
            })
            .collect();
        stats.sort_by_key(|s| s.cpl);
        stats
    }
}

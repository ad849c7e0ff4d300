//! Admission and removal.
//!
//! SECURITY-CRITICAL: check-then-commit ordering of the policy hooks.

use tracing::{debug, warn};

use crate::domain::{CplDiversityStats, NodeId, PeerGroupInfo};

use super::filter::DiversityFilter;

impl DiversityFilter {
    /// Attempt to admit a peer.
    ///
    /// # Protocol
    /// 1. Whitelisted peers pass without bookkeeping.
    /// 2. Every address is reduced to an IP group; any failure rejects.
    /// 3. `allow` is asked for every group, stopping at the first refusal.
    /// 4. Only then is `increment` called for every group and the peer
    ///    recorded under its CPL.
    ///
    /// Rejection leaves both the filter and the policy untouched. Offering an
    /// admitted peer again runs the full check and, on success, appends the
    /// new groups to the ones already recorded.
    pub fn try_add(&self, peer: &NodeId) -> bool {
        let mut state = self.state.lock();

        if state.whitelist.contains(peer) {
            debug!(log_key = %self.log_key, peer = %peer, "whitelisted peer admitted");
            return true;
        }

        let cpl = self.cpl_lookup.cpl(peer);

        let addrs = self.policy.peer_addresses(peer);
        if addrs.is_empty() {
            debug!(log_key = %self.log_key, peer = %peer, "no addresses found for peer");
            return false;
        }

        let mut groups = Vec::with_capacity(addrs.len());
        for addr in &addrs {
            let ip = match addr.to_ip() {
                Ok(ip) => ip,
                Err(e) => {
                    warn!(
                        log_key = %self.log_key,
                        peer = %peer,
                        addr = %addr,
                        error = %e,
                        "failed to convert address to IP"
                    );
                    return false;
                }
            };

            let key = match self.ip_group_key(ip) {
                Ok(key) => key,
                Err(e) => {
                    warn!(
                        log_key = %self.log_key,
                        peer = %peer,
                        ip = %ip,
                        error = %e,
                        "failed to find group key"
                    );
                    return false;
                }
            };
            if key.is_empty() {
                warn!(log_key = %self.log_key, peer = %peer, ip = %ip, "group key is empty");
                return false;
            }

            groups.push(PeerGroupInfo::new(*peer, cpl, key));
        }

        for group in &groups {
            if !self.policy.allow(group) {
                debug!(
                    log_key = %self.log_key,
                    peer = %peer,
                    cpl = cpl,
                    group = %group.ip_group_key,
                    "peer rejected by grouping policy"
                );
                return false;
            }
        }

        for group in &groups {
            self.policy.increment(group);
        }
        debug!(
            log_key = %self.log_key,
            peer = %peer,
            cpl = cpl,
            groups = groups.len(),
            "peer admitted"
        );
        state.commit(*peer, cpl, groups);

        true
    }

    /// Release a peer's groups.
    ///
    /// Calls `decrement` once per group recorded at admission, including
    /// groups appended by repeated admissions. No-op for peers that were
    /// never admitted or were only whitelisted.
    ///
    /// The CPL lookup must return the same value it did at admission. If it
    /// does not, the peer is still dropped from every bucket its groups were
    /// recorded under, so no bucket entry is left behind.
    pub fn remove(&self, peer: &NodeId) {
        let mut state = self.state.lock();

        let cpl = self.cpl_lookup.cpl(peer);
        let groups = state.release(peer, cpl);

        if let Some(drifted) = groups.iter().find(|g| g.cpl != cpl) {
            warn!(
                log_key = %self.log_key,
                peer = %peer,
                admitted_cpl = drifted.cpl,
                cpl = cpl,
                "CPL lookup changed since admission"
            );
        }

        for group in &groups {
            self.policy.decrement(group);
        }

        if !groups.is_empty() {
            debug!(
                log_key = %self.log_key,
                peer = %peer,
                cpl = cpl,
                groups = groups.len(),
                "peer removed"
            );
        }
    }

    /// Exempt peers from every diversity check. There is no way back.
    pub fn whitelist_peers(&self, peers: &[NodeId]) {
        let mut state = self.state.lock();
        state.whitelist.extend(peers.iter().copied());
    }

    /// Snapshot of every non-empty CPL bucket, ascending by CPL.
    ///
    /// The result is a deep copy; mutating it does not touch the filter.
    pub fn diversity_stats(&self) -> Vec<CplDiversityStats> {
        self.state.lock().snapshot()
    }
}

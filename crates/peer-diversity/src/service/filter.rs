use std::net::IpAddr;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::domain::{
    asn_group_key, ipv4_group_key, DiversityError, LegacyClassA, NodeId, PeerGroupInfo,
    PeerIpGroupKey,
};
use crate::ports::{AsnLookup, CplLookup, GroupingPolicy};

use super::state::FilterState;

/// Diversity filter guarding routing-table admission.
///
/// Derives an IP group for every address of a candidate peer and asks the
/// injected [`GroupingPolicy`] whether each group may grow. Admission is
/// all-or-nothing: `increment` runs only after every `allow` passed.
///
/// ## Thread Safety
///
/// One `parking_lot::Mutex` guards all state and is held for the whole of
/// every public call, including the collaborator callbacks. Share the filter
/// across tasks via `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use peer_diversity::{DiversityFilter, LocalCplLookup, NoAsnLookup};
///
/// let filter = DiversityFilter::new(
///     policy,
///     "rt/diversity",
///     Arc::new(LocalCplLookup::new(local_id)),
///     Arc::new(NoAsnLookup),
/// )?;
///
/// if filter.try_add(&peer) {
///     // insert into bucket
/// }
/// ```
pub struct DiversityFilter {
    /// Shared diversity policy (not owned)
    pub(crate) policy: Arc<dyn GroupingPolicy>,
    /// Diagnostic key attached to every log event
    pub(crate) log_key: String,
    /// CPL of a peer against the local node
    pub(crate) cpl_lookup: Arc<dyn CplLookup>,
    /// ASN source for IPv6 grouping
    pub(crate) asn_lookup: Arc<dyn AsnLookup>,
    /// Legacy Class A networks grouped at /8
    pub(crate) legacy: LegacyClassA,
    /// All bookkeeping, behind one lock
    pub(crate) state: Mutex<FilterState>,
}

impl DiversityFilter {
    /// Create a filter.
    ///
    /// # Errors
    ///
    /// `DiversityError::Configuration` if the built-in legacy Class A list
    /// cannot be parsed.
    pub fn new(
        policy: Arc<dyn GroupingPolicy>,
        log_key: impl Into<String>,
        cpl_lookup: Arc<dyn CplLookup>,
        asn_lookup: Arc<dyn AsnLookup>,
    ) -> Result<Self, DiversityError> {
        Ok(Self::with_legacy(
            policy,
            log_key.into(),
            cpl_lookup,
            asn_lookup,
            LegacyClassA::builtin()?,
        ))
    }

    pub(crate) fn with_legacy(
        policy: Arc<dyn GroupingPolicy>,
        log_key: String,
        cpl_lookup: Arc<dyn CplLookup>,
        asn_lookup: Arc<dyn AsnLookup>,
        legacy: LegacyClassA,
    ) -> Self {
        Self {
            policy,
            log_key,
            cpl_lookup,
            asn_lookup,
            legacy,
            state: Mutex::new(FilterState::default()),
        }
    }

    /// Diagnostic key.
    pub fn log_key(&self) -> &str {
        &self.log_key
    }

    /// True if `peer` bypasses diversity checks.
    pub fn is_whitelisted(&self, peer: &NodeId) -> bool {
        self.state.lock().whitelist.contains(peer)
    }

    /// Groups currently recorded for `peer` (empty if not admitted).
    pub fn peer_groups(&self, peer: &NodeId) -> Vec<PeerGroupInfo> {
        self.state
            .lock()
            .peer_groups
            .get(peer)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of admitted (non-whitelisted) peers.
    pub fn admitted_count(&self) -> usize {
        self.state.lock().peer_groups.len()
    }

    /// Group key for one IP.
    ///
    /// IPv4 (including IPv4-mapped IPv6) is grouped by network prefix, native
    /// IPv6 by ASN.
    pub fn ip_group_key(&self, ip: IpAddr) -> Result<PeerIpGroupKey, DiversityError> {
        let v6 = match ip {
            IpAddr::V4(v4) => return Ok(ipv4_group_key(v4, &self.legacy)),
            IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                Some(v4) => return Ok(ipv4_group_key(v4, &self.legacy)),
                None => v6,
            },
        };

        let asn = self
            .asn_lookup
            .asn_for_ipv6(&v6)
            .map_err(|e| DiversityError::AsnLookup {
                ip,
                reason: e.to_string(),
            })?;

        if asn.as_deref().map_or(true, str::is_empty) {
            debug!(log_key = %self.log_key, ip = %ip, "ASN not known");
        }
        Ok(asn_group_key(asn))
    }
}

impl std::fmt::Debug for DiversityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = f.debug_struct("DiversityFilter");
        out.field("log_key", &self.log_key);
        // try_lock: formatting from inside a policy callback must not deadlock
        if let Some(state) = self.state.try_lock() {
            out.field("admitted", &state.peer_groups.len())
                .field("buckets", &state.cpl_peer_groups.len())
                .field("whitelisted", &state.whitelist.len());
        }
        out.finish()
    }
}

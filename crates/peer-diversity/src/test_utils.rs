//! Test utilities for the diversity filter.
//!
//! Deterministic collaborator fakes. Enable with the `test-utils` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use peer_diversity::test_utils::{node_id, RecordingPolicy};
//! use peer_diversity::{DiversityFilterBuilder, PeerAddress};
//!
//! let policy = Arc::new(RecordingPolicy::with_cap(2));
//! policy.set_addresses(node_id(1), vec![PeerAddress::Ip("10.1.0.1".parse().unwrap())]);
//!
//! let filter = DiversityFilterBuilder::new()
//!     .policy(policy.clone())
//!     .local_node(node_id(0))
//!     .build()
//!     .unwrap();
//!
//! assert!(filter.try_add(&node_id(1)));
//! assert_eq!(policy.increments().len(), 1);
//! ```

use std::collections::{HashMap, HashSet};
use std::net::Ipv6Addr;

use parking_lot::Mutex;

use crate::domain::{AsnLookupError, NodeId, PeerAddress, PeerGroupInfo, PeerIpGroupKey};
use crate::ports::{AsnLookup, CplLookup, GroupingPolicy};

/// NodeId with first byte set to `val`, rest zeroed.
pub fn node_id(val: u8) -> NodeId {
    let mut bytes = [0u8; 32];
    bytes[0] = val;
    NodeId::new(bytes)
}

/// One policy hook invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyCall {
    /// `allow` was asked.
    Allow(PeerGroupInfo),
    /// `increment` was called.
    Increment(PeerGroupInfo),
    /// `decrement` was called.
    Decrement(PeerGroupInfo),
}

#[derive(Debug, Default)]
struct RecordingState {
    calls: Vec<PolicyCall>,
    counts: HashMap<PeerIpGroupKey, usize>,
    addresses: HashMap<NodeId, Vec<PeerAddress>>,
    denied: HashSet<PeerIpGroupKey>,
}

/// Policy that records every hook call.
///
/// Allows a group while fewer than `cap` peers hold it (unlimited without a
/// cap) and never allows groups marked with `deny_group`.
#[derive(Debug, Default)]
pub struct RecordingPolicy {
    cap: Option<usize>,
    state: Mutex<RecordingState>,
}

impl RecordingPolicy {
    /// Policy that allows everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy that allows at most `cap` peers per group.
    pub fn with_cap(cap: usize) -> Self {
        Self {
            cap: Some(cap),
            state: Mutex::default(),
        }
    }

    /// Addresses returned for `peer`.
    pub fn set_addresses(&self, peer: NodeId, addrs: Vec<PeerAddress>) {
        self.state.lock().addresses.insert(peer, addrs);
    }

    /// Always refuse `key`.
    pub fn deny_group(&self, key: impl Into<PeerIpGroupKey>) {
        self.state.lock().denied.insert(key.into());
    }

    /// Current count for `key`.
    pub fn count(&self, key: &PeerIpGroupKey) -> usize {
        self.state.lock().counts.get(key).copied().unwrap_or(0)
    }

    /// Every call, in order.
    pub fn calls(&self) -> Vec<PolicyCall> {
        self.state.lock().calls.clone()
    }

    /// Groups passed to `increment`, in order.
    pub fn increments(&self) -> Vec<PeerGroupInfo> {
        self.filter_calls(|c| match c {
            PolicyCall::Increment(g) => Some(g.clone()),
            _ => None,
        })
    }

    /// Groups passed to `decrement`, in order.
    pub fn decrements(&self) -> Vec<PeerGroupInfo> {
        self.filter_calls(|c| match c {
            PolicyCall::Decrement(g) => Some(g.clone()),
            _ => None,
        })
    }

    /// Groups passed to `allow`, in order.
    pub fn allows(&self) -> Vec<PeerGroupInfo> {
        self.filter_calls(|c| match c {
            PolicyCall::Allow(g) => Some(g.clone()),
            _ => None,
        })
    }

    /// Forget recorded calls, keeping counts and addresses.
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn filter_calls<F>(&self, f: F) -> Vec<PeerGroupInfo>
    where
        F: Fn(&PolicyCall) -> Option<PeerGroupInfo>,
    {
        self.state.lock().calls.iter().filter_map(f).collect()
    }
}

impl GroupingPolicy for RecordingPolicy {
    fn allow(&self, group: &PeerGroupInfo) -> bool {
        let mut state = self.state.lock();
        state.calls.push(PolicyCall::Allow(group.clone()));
        if state.denied.contains(&group.ip_group_key) {
            return false;
        }
        match self.cap {
            Some(cap) => state.counts.get(&group.ip_group_key).copied().unwrap_or(0) < cap,
            None => true,
        }
    }

    fn increment(&self, group: &PeerGroupInfo) {
        let mut state = self.state.lock();
        state.calls.push(PolicyCall::Increment(group.clone()));
        *state.counts.entry(group.ip_group_key.clone()).or_insert(0) += 1;
    }

    fn decrement(&self, group: &PeerGroupInfo) {
        let mut state = self.state.lock();
        state.calls.push(PolicyCall::Decrement(group.clone()));
        if let Some(n) = state.counts.get_mut(&group.ip_group_key) {
            *n = n.saturating_sub(1);
        }
    }

    fn peer_addresses(&self, peer: &NodeId) -> Vec<PeerAddress> {
        self.state
            .lock()
            .addresses
            .get(peer)
            .cloned()
            .unwrap_or_default()
    }
}

/// ASN lookup with scripted answers per address.
#[derive(Debug, Default)]
pub struct FixedAsnLookup {
    answers: HashMap<Ipv6Addr, Result<Option<String>, AsnLookupError>>,
}

impl FixedAsnLookup {
    /// Lookup that knows nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `ip` to `asn`.
    pub fn with_asn(mut self, ip: Ipv6Addr, asn: impl Into<String>) -> Self {
        self.answers.insert(ip, Ok(Some(asn.into())));
        self
    }

    /// Fail the lookup for `ip`.
    pub fn with_failure(mut self, ip: Ipv6Addr, reason: impl Into<String>) -> Self {
        self.answers.insert(ip, Err(AsnLookupError::new(reason)));
        self
    }
}

impl AsnLookup for FixedAsnLookup {
    fn asn_for_ipv6(&self, ip: &Ipv6Addr) -> Result<Option<String>, AsnLookupError> {
        self.answers.get(ip).cloned().unwrap_or(Ok(None))
    }
}

/// CPL lookup backed by a mutable map.
///
/// Peers without an entry get `default`. Entries can be changed mid-test to
/// simulate a CPL source that drifts.
#[derive(Debug, Default)]
pub struct MapCplLookup {
    default: u32,
    cpls: Mutex<HashMap<NodeId, u32>>,
}

impl MapCplLookup {
    /// Every unknown peer maps to `default`.
    pub fn new(default: u32) -> Self {
        Self {
            default,
            cpls: Mutex::default(),
        }
    }

    /// Map `peer` to `cpl`.
    pub fn with(self, peer: NodeId, cpl: u32) -> Self {
        self.set(peer, cpl);
        self
    }

    /// Change the CPL reported for `peer`.
    pub fn set(&self, peer: NodeId, cpl: u32) {
        self.cpls.lock().insert(peer, cpl);
    }
}

impl CplLookup for MapCplLookup {
    fn cpl(&self, peer: &NodeId) -> u32 {
        self.cpls.lock().get(peer).copied().unwrap_or(self.default)
    }
}

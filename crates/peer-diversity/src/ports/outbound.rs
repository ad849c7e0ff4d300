//! # Driven Ports (Outbound SPI)
//!
//! Interfaces the host application provides to the filter.
//!
//! # Locking contract
//!
//! `GroupingPolicy`, `CplLookup` and `AsnLookup` are invoked while the filter
//! holds its lock. Implementations must return quickly, must not block on
//! I/O indefinitely and must never call back into the filter.

use std::net::Ipv6Addr;

use crate::domain::{common_prefix_len, AsnLookupError, NodeId, PeerAddress, PeerGroupInfo};

/// Pluggable diversity policy.
///
/// The filter guarantees that `increment` is only called after `allow`
/// returned true for every group of the peer, and that `remove` issues one
/// `decrement` per earlier `increment` with an equal `PeerGroupInfo`.
pub trait GroupingPolicy: Send + Sync {
    /// Would admitting this group keep the table diverse enough?
    fn allow(&self, group: &PeerGroupInfo) -> bool;

    /// Record an admitted group.
    fn increment(&self, group: &PeerGroupInfo);

    /// Release a previously admitted group.
    fn decrement(&self, group: &PeerGroupInfo);

    /// Every known address of the peer. An empty list rejects the peer.
    fn peer_addresses(&self, peer: &NodeId) -> Vec<PeerAddress>;
}

/// Common prefix length of a peer against the local node.
///
/// Must be deterministic per peer: `remove` recomputes it to find the bucket
/// the peer was recorded under.
pub trait CplLookup: Send + Sync {
    /// CPL of `peer`.
    fn cpl(&self, peer: &NodeId) -> u32;
}

impl<F> CplLookup for F
where
    F: Fn(&NodeId) -> u32 + Send + Sync,
{
    fn cpl(&self, peer: &NodeId) -> u32 {
        self(peer)
    }
}

/// CPL against a fixed local node ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalCplLookup {
    local: NodeId,
}

impl LocalCplLookup {
    /// Lookup relative to `local`.
    pub fn new(local: NodeId) -> Self {
        Self { local }
    }

    /// Local node ID.
    pub fn local(&self) -> &NodeId {
        &self.local
    }
}

impl CplLookup for LocalCplLookup {
    fn cpl(&self, peer: &NodeId) -> u32 {
        common_prefix_len(&self.local, peer)
    }
}

/// Autonomous System lookup for IPv6 addresses.
pub trait AsnLookup: Send + Sync {
    /// ASN owning `ip`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(asn))` when a mapping exists
    /// - `Ok(None)` when no mapping exists (not an error)
    /// - `Err(_)` when the lookup itself failed
    fn asn_for_ipv6(&self, ip: &Ipv6Addr) -> Result<Option<String>, AsnLookupError>;
}

/// Source of peer addresses for the bundled `GroupLimitPolicy`.
pub trait AddressBook: Send + Sync {
    /// Every known address of `peer`.
    fn addresses_of(&self, peer: &NodeId) -> Vec<PeerAddress>;
}

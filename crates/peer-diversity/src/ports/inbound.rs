//! # Driving Ports (Inbound API)
//!
//! The API the filter exposes to the routing table.

use crate::domain::{CplDiversityStats, NodeId};

/// Admission control for routing-table buckets.
///
/// All methods take `&self`; implementations serialize internally so one
/// filter can be shared across lookup and maintenance tasks via `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// use peer_diversity::PeerDiversityApi;
///
/// fn on_peer_discovered(filter: &dyn PeerDiversityApi, peer: NodeId) {
///     if !filter.try_add(&peer) {
///         return; // too many peers from the same network
///     }
///     // ... insert into bucket
/// }
/// ```
pub trait PeerDiversityApi: Send + Sync {
    /// Attempt to admit a peer.
    ///
    /// # Returns
    ///
    /// - `true` if the peer is whitelisted or every one of its address
    ///   groups was allowed and has been recorded
    /// - `false` otherwise; no state changes on rejection
    fn try_add(&self, peer: &NodeId) -> bool;

    /// Release every group recorded for a peer. No-op for unknown peers.
    fn remove(&self, peer: &NodeId);

    /// Exempt peers from all diversity checks. Permanent.
    fn whitelist_peers(&self, peers: &[NodeId]);

    /// Per-CPL snapshot of admitted peers and their group keys, ascending by CPL.
    fn diversity_stats(&self) -> Vec<CplDiversityStats>;
}
